//! The page environment a session runs in.

use std::sync::{Mutex, MutexGuard};
use url::Url;

/// Navigation and location primitives of the hosting page.
///
/// Passed to the session explicitly so that reading the current location
/// and navigating away are visible dependencies.
pub trait SessionEnvironment: Send + Sync {
	/// The page's current location.
	fn current_url(&self) -> Url;

	/// Rewrites the visible location without reloading.
	fn replace_url(&self, url: Url);

	/// Navigates away. Nothing after this call is guaranteed to run on a
	/// real page.
	fn assign(&self, url: Url);
}

#[derive(Debug)]
struct PageState {
	current: Url,
	navigations: Vec<Url>,
	replacements: usize,
}

/// Environment that keeps the location in memory and records navigations
/// instead of performing them.
#[derive(Debug)]
pub struct MemoryEnvironment {
	state: Mutex<PageState>,
}

impl MemoryEnvironment {
	pub fn new(current: Url) -> Self {
		Self {
			state: Mutex::new(PageState {
				current,
				navigations: Vec::new(),
				replacements: 0,
			}),
		}
	}

	fn lock(&self) -> MutexGuard<'_, PageState> {
		// Poisoning only means another holder panicked; the state is still usable.
		self.state.lock().unwrap_or_else(|e| e.into_inner())
	}

	/// Simulates the browser landing on `url`, e.g. a wallet callback.
	pub fn set_current_url(&self, url: Url) {
		self.lock().current = url;
	}

	pub fn navigations(&self) -> Vec<Url> {
		self.lock().navigations.clone()
	}

	pub fn last_navigation(&self) -> Option<Url> {
		self.lock().navigations.last().cloned()
	}

	/// How many times the location was rewritten in place.
	pub fn replacements(&self) -> usize {
		self.lock().replacements
	}
}

impl SessionEnvironment for MemoryEnvironment {
	fn current_url(&self) -> Url {
		self.lock().current.clone()
	}

	fn replace_url(&self, url: Url) {
		let mut state = self.lock();
		state.current = url;
		state.replacements += 1;
	}

	fn assign(&self, url: Url) {
		self.lock().navigations.push(url);
	}
}
