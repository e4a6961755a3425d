mod common;
mod plan_tests;
