//! Integration tests driving the affected-ci binary

mod helpers;
mod test_init;
mod test_packages;
mod test_run;
