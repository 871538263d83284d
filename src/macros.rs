// Acquire a mutex guard, mapping a poisoned lock to `Error::LockError`
macro_rules! lock {
    ($lock:expr) => {
        $lock.lock().map_err(|_| crate::Error::LockError)
    };
}
