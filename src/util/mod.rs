//! Test support shared by unit and integration tests. Public so that
//! `tests/` can reach it, the same way the CLI tests reach it.

pub mod testing;
