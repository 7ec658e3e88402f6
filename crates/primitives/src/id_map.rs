/// Read-only bidirectional mapping between dense `u32` ids and values.
///
/// Absent ids and unknown values yield `None`. Implementors decide how values
/// are compared; registries compare by identity.
pub trait IntBiMap<T> {
	/// Number of mapped values.
	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn get_by_id(&self, id: u32) -> Option<T>;

	fn get_id(&self, value: &T) -> Option<u32>;

	/// All mapped values in ascending id order.
	fn values(&self) -> Vec<T>;
}
