pub(crate) const ERR_POISONED_LOCK: &str = "a line lock was poisoned, which means a panic occurred mid-update and the occupancy map can no longer be trusted";
