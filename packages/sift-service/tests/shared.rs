use std::sync::Arc;

use sift_service::{Error, Providers, shared};
use sift_testkit::{FailingEmbedding, FailingRerank};

// Single test: the installed set is process-wide.
#[test]
fn providers_are_installed_once() {
	assert!(shared::get().is_none());

	let first = shared::init(sift_testkit::stub_providers());
	let second = shared::init(Providers::new(Arc::new(FailingEmbedding), Arc::new(FailingRerank)));

	assert!(std::ptr::eq(first, second));
	assert!(Arc::ptr_eq(&first.embedding, &second.embedding));

	let built = shared::init_with(|| Err(Error::provider("must not be called")))
		.expect("installed providers are returned without building");

	assert!(std::ptr::eq(first, built));
	assert!(shared::get().is_some_and(|providers| std::ptr::eq(providers, first)));
}
