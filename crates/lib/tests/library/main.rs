mod common;
mod composer_tests;
mod lua_tests;
