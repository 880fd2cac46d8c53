//! Unit tests for environment helpers.

use anyhow::{Result, ensure};

use super::{lock, remove_var, set_var};

fn current(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[test]
fn set_var_restores_absent_variable() -> Result<()> {
    let key = "TINY_HIERA_TEST_SET_ABSENT";
    let _lock = lock();
    let cleared = remove_var(key);
    {
        let _guard = set_var(key, "value");
        ensure!(current(key).as_deref() == Some("value"));
    }
    ensure!(current(key).is_none(), "variable should be removed again");
    drop(cleared);
    Ok(())
}

#[test]
fn stacked_guards_restore_in_reverse_order() -> Result<()> {
    let key = "TINY_HIERA_TEST_STACKED";
    let _lock = lock();
    let base = set_var(key, "original");
    let outer = set_var(key, "outer");
    let inner = set_var(key, "inner");
    ensure!(current(key).as_deref() == Some("inner"));
    drop(inner);
    ensure!(current(key).as_deref() == Some("outer"));
    drop(outer);
    ensure!(current(key).as_deref() == Some("original"));
    drop(base);
    Ok(())
}

#[test]
fn remove_var_restores_previous_value() -> Result<()> {
    let key = "TINY_HIERA_TEST_REMOVE";
    let _lock = lock();
    let base = set_var(key, "kept");
    {
        let _guard = remove_var(key);
        ensure!(current(key).is_none());
    }
    ensure!(current(key).as_deref() == Some("kept"));
    drop(base);
    Ok(())
}
