//! Process-wide scoring providers.
//!
//! Models are installed once and then only read; concurrent searches share them without locks.

use std::sync::OnceLock;

use crate::{Providers, Result};

static SHARED: OnceLock<Providers> = OnceLock::new();

/// Installs `providers` unless another set is already installed; returns the installed set.
pub fn init(providers: Providers) -> &'static Providers {
	SHARED.get_or_init(|| providers)
}

/// Builds and installs providers on first use. Later calls return the installed set without
/// running `build`.
pub fn init_with<F>(build: F) -> Result<&'static Providers>
where
	F: FnOnce() -> Result<Providers>,
{
	if let Some(providers) = SHARED.get() {
		return Ok(providers);
	}

	let providers = build()?;

	Ok(SHARED.get_or_init(|| providers))
}

pub fn get() -> Option<&'static Providers> {
	SHARED.get()
}
