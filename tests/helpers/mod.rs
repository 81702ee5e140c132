#![allow(dead_code, unused_imports)]

mod stack;
mod test_postgres;

pub use stack::{
    TestStack, provisioning_settings, spawn_stack, spawn_stack_sharing, spawn_stack_with,
    wait_for_terminal,
};
pub use test_postgres::TestPostgres;
