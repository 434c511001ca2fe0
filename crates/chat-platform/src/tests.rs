#[cfg(test)]
mod tests {
    use crate::host::HeadlessHost;
    use crate::storage::MemoryStorage;
    use chat_core::ports::{HostPort, StoragePort};

    // Minimal single-threaded executor; the in-memory adapters never
    // actually suspend.
    fn block_on<F: std::future::Future<Output = T>, T>(f: F) -> T {
        use std::sync::Arc;
        use std::task::{Context, Poll, Wake, Waker};

        struct NoopWaker;
        impl Wake for NoopWaker {
            fn wake(self: Arc<Self>) {}
        }

        let waker = Waker::from(Arc::new(NoopWaker));
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(val) => return val,
                Poll::Pending => std::thread::yield_now(),
            }
        }
    }

    #[test]
    fn test_memory_storage_set_and_get() {
        let storage = MemoryStorage::new();
        block_on(async {
            storage.set("key", b"value").await.unwrap();
            assert_eq!(storage.get("key").await.unwrap(), Some(b"value".to_vec()));
        });
    }

    #[test]
    fn test_memory_storage_get_missing() {
        let storage = MemoryStorage::new();
        block_on(async {
            assert_eq!(storage.get("missing").await.unwrap(), None);
        });
    }

    #[test]
    fn test_memory_storage_overwrite() {
        let storage = MemoryStorage::new();
        block_on(async {
            storage.set("key", b"one").await.unwrap();
            storage.set("key", b"two").await.unwrap();
            assert_eq!(storage.get("key").await.unwrap(), Some(b"two".to_vec()));
        });
    }

    #[test]
    fn test_memory_storage_delete() {
        let storage = MemoryStorage::new();
        block_on(async {
            storage.set("key", b"value").await.unwrap();
            storage.delete("key").await.unwrap();
            assert_eq!(storage.get("key").await.unwrap(), None);
        });
    }

    #[test]
    fn test_memory_storage_backend_name() {
        assert_eq!(MemoryStorage::new().backend_name(), "memory");
    }

    #[test]
    fn test_headless_host_accepting() {
        let host = HeadlessHost::accepting();
        assert!(host.confirm("Delete this chat?"));
        assert!(!host.restart_requested());
        host.restart();
        assert!(host.restart_requested());
    }

    #[test]
    fn test_headless_host_declining() {
        let host = HeadlessHost::declining();
        assert!(!host.confirm("Delete this chat?"));
    }
}
