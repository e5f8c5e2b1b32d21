//! Per-key mutual exclusion for the expensive search path.

use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

struct Slot {
	lock: Arc<AsyncMutex<()>>,
	users: usize,
}

/// Registry of in-flight request keys. An entry lives exactly as long as some caller holds or
/// waits on it; the last one out removes it, whether it finished, failed, or was cancelled.
#[derive(Default)]
pub struct SingleFlight {
	slots: Mutex<HashMap<String, Slot>>,
}
impl SingleFlight {
	/// Waits until no other caller holds `key`, then returns a guard that releases it on drop.
	pub async fn acquire(&self, key: &str) -> FlightGuard<'_> {
		let registration = self.register(key);
		let permit = Arc::clone(&registration.lock).lock_owned().await;

		FlightGuard { _permit: permit, _registration: registration }
	}

	pub fn len(&self) -> usize {
		self.slots.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn register(&self, key: &str) -> Registration<'_> {
		let mut slots = self.slots.lock().unwrap_or_else(|err| err.into_inner());
		let slot = slots
			.entry(key.to_string())
			.or_insert_with(|| Slot { lock: Arc::new(AsyncMutex::new(())), users: 0 });

		slot.users += 1;

		Registration { registry: self, key: key.to_string(), lock: Arc::clone(&slot.lock) }
	}

	fn release(&self, key: &str, lock: &Arc<AsyncMutex<()>>) {
		let mut slots = self.slots.lock().unwrap_or_else(|err| err.into_inner());
		let Some(slot) = slots.get_mut(key) else {
			return;
		};

		if !Arc::ptr_eq(&slot.lock, lock) {
			return;
		}

		slot.users = slot.users.saturating_sub(1);

		if slot.users == 0 {
			slots.remove(key);
		}
	}
}

struct Registration<'a> {
	registry: &'a SingleFlight,
	key: String,
	lock: Arc<AsyncMutex<()>>,
}
impl Drop for Registration<'_> {
	fn drop(&mut self) {
		self.registry.release(&self.key, &self.lock);
	}
}

/// Exclusive hold on one request key.
pub struct FlightGuard<'a> {
	// Field order matters: the permit is released before the registration is dropped.
	_permit: OwnedMutexGuard<()>,
	_registration: Registration<'a>,
}
