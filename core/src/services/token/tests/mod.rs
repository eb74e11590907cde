pub(crate) mod fixtures;
mod key_manager_tests;
