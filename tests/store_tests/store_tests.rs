//! Store Tests
//!
//! Tests verify:
//! - Typed set/get and type mismatches
//! - Argument and read-only errors
//! - Change notification on set, remove and clear_all
//! - Instance sharing and isolation through the factory
//! - Copy semantics at the buffer boundary
//! - Configuration validation

use std::sync::Arc;

use kvbridge::{
    BridgeError, EncryptionType, HostString, NativeBuffer, StoreConfig, StoreFactory, StoreMode,
    TextHandle,
};
use parking_lot::Mutex;

// =============================================================================
// Helper Functions
// =============================================================================

fn open(factory: &StoreFactory, id: &str) -> kvbridge::Store {
    factory
        .create(StoreConfig::builder().id(id).build())
        .unwrap()
}

fn record(store: &kvbridge::Store) -> Arc<Mutex<Vec<String>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    store.add_on_value_changed_listener(move |key| sink.lock().push(key.to_string()));
    events
}

// =============================================================================
// Typed Value Tests
// =============================================================================

#[test]
fn test_set_and_get_each_type() {
    let factory = StoreFactory::new();
    let store = open(&factory, "typed");

    store.set("flag", true).unwrap();
    store.set("count", 42.5).unwrap();
    store.set("int", 7).unwrap();
    store.set("name", "Marc").unwrap();
    store.set("blob", NativeBuffer::from_owned(vec![1u8, 2, 3])).unwrap();

    assert_eq!(store.get_boolean("flag"), Some(true));
    assert_eq!(store.get_number("count"), Some(42.5));
    assert_eq!(store.get_number("int"), Some(7.0));
    assert_eq!(store.get_string("name").as_deref(), Some("Marc"));
    assert_eq!(store.get_buffer("blob").unwrap().as_slice(), &[1, 2, 3]);
}

#[test]
fn test_get_with_wrong_type_returns_none() {
    let factory = StoreFactory::new();
    let store = open(&factory, "mismatch");

    store.set("name", "Marc").unwrap();

    assert_eq!(store.get_boolean("name"), None);
    assert_eq!(store.get_number("name"), None);
    assert!(store.get_buffer("name").is_none());
    assert_eq!(store.get_string("missing"), None);
}

#[test]
fn test_overwrite_changes_type() {
    let factory = StoreFactory::new();
    let store = open(&factory, "overwrite");

    store.set("k", 1).unwrap();
    store.set("k", false).unwrap();

    assert_eq!(store.get_number("k"), None);
    assert_eq!(store.get_boolean("k"), Some(false));
}

#[test]
fn test_get_all_keys_sorted() {
    let factory = StoreFactory::new();
    let store = open(&factory, "keys");

    store.set("b", 1).unwrap();
    store.set("a", 2).unwrap();
    store.set("c", 3).unwrap();

    assert_eq!(store.get_all_keys(), vec!["a", "b", "c"]);
    assert!(store.contains("a"));
    assert!(!store.contains("z"));
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_empty_key_rejected() {
    let factory = StoreFactory::new();
    let store = open(&factory, "empty-key");
    let events = record(&store);

    assert_eq!(store.set("", 1), Err(BridgeError::EmptyKey));
    assert!(events.lock().is_empty());
}

#[test]
fn test_read_only_rejects_mutations() {
    let factory = StoreFactory::new();
    let writer = open(&factory, "ro");
    writer.set("k", 1).unwrap();

    let reader = factory
        .create(StoreConfig::builder().id("ro").read_only(true).build())
        .unwrap();
    let expected = Err(BridgeError::ReadOnly { id: "ro".to_string() });

    assert!(reader.is_read_only());
    assert_eq!(reader.set("k", 2), expected);
    assert_eq!(reader.remove("k").map(|_| ()), expected);
    assert_eq!(reader.clear_all(), expected);
    assert_eq!(reader.recrypt(Some("key")), expected);
    assert_eq!(reader.get_number("k"), Some(1.0));
}

#[test]
fn test_invalid_config_rejected() {
    let factory = StoreFactory::new();

    let err = factory.create(StoreConfig::builder().id("").build()).unwrap_err();
    assert!(matches!(err, BridgeError::InvalidConfig(_)));

    let err = factory
        .create(
            StoreConfig::builder()
                .id("secret")
                .encryption_key("0123456789abcdefX")
                .build(),
        )
        .unwrap_err();
    assert_eq!(err, BridgeError::EncryptionKeyTooLong { len: 17, max: 16 });
    assert!(!factory.exists("secret"));
}

#[test]
fn test_config_builder() {
    let config = StoreConfig::builder()
        .id("user")
        .path("/tmp/kv")
        .encryption_key("hunter2")
        .mode(StoreMode::MultiProcess)
        .build();

    assert_eq!(config.id, "user");
    assert_eq!(config.mode, StoreMode::MultiProcess);
    assert!(config.is_encrypted());
    assert!(config.validate().is_ok());

    let default = StoreConfig::default();
    assert_eq!(default.id, "mmkv.default");
    assert!(!default.is_encrypted());
    assert_eq!(default.encryption_type, EncryptionType::Aes128);
}

#[test]
fn test_key_length_depends_on_encryption_type() {
    let factory = StoreFactory::new();
    let key = "0123456789abcdef0123456789abcdef";

    let err = factory
        .create(
            StoreConfig::builder()
                .id("aes128")
                .encryption_key(key)
                .build(),
        )
        .unwrap_err();
    assert_eq!(err, BridgeError::EncryptionKeyTooLong { len: 32, max: 16 });
    assert_eq!(
        err.to_string(),
        "Encryption key cannot be longer than 16 bytes (got 32)"
    );

    let store = factory
        .create(
            StoreConfig::builder()
                .id("aes256")
                .encryption_key(key)
                .encryption_type(EncryptionType::Aes256)
                .build(),
        )
        .unwrap();
    assert!(store.config().is_encrypted());

    let err = factory
        .create(
            StoreConfig::builder()
                .id("aes256-long")
                .encryption_key(format!("{}X", key))
                .encryption_type(EncryptionType::Aes256)
                .build(),
        )
        .unwrap_err();
    assert_eq!(err, BridgeError::EncryptionKeyTooLong { len: 33, max: 32 });
}

#[test]
fn test_recrypt_uses_instance_encryption_type() {
    let factory = StoreFactory::new();
    let key = "0123456789abcdef0123456789abcdef";

    let aes256 = factory
        .create(
            StoreConfig::builder()
                .id("recrypt256")
                .encryption_type(EncryptionType::Aes256)
                .build(),
        )
        .unwrap();
    assert!(aes256.recrypt(Some(key)).is_ok());

    let aes128 = open(&factory, "recrypt128");
    assert_eq!(
        aes128.recrypt(Some(key)),
        Err(BridgeError::EncryptionKeyTooLong { len: 32, max: 16 })
    );
}

#[test]
fn test_recrypt_key_length() {
    let factory = StoreFactory::new();
    let store = open(&factory, "recrypt");

    assert!(store.recrypt(Some("0123456789abcdef")).is_ok());
    assert_eq!(
        store.recrypt(Some("0123456789abcdef0")),
        Err(BridgeError::EncryptionKeyTooLong { len: 17, max: 16 })
    );
    assert!(store.recrypt(None).is_ok());
}

// =============================================================================
// Notification Tests
// =============================================================================

#[test]
fn test_set_notifies_with_key() {
    let factory = StoreFactory::new();
    let store = open(&factory, "notify");
    let events = record(&store);

    store.set("a", 1).unwrap();
    store.set("b", "x").unwrap();

    assert_eq!(*events.lock(), vec!["a", "b"]);
}

#[test]
fn test_remove_notifies_only_when_removed() {
    let factory = StoreFactory::new();
    let store = open(&factory, "remove");
    store.set("k", 1).unwrap();
    let events = record(&store);

    assert_eq!(store.remove("missing"), Ok(false));
    assert_eq!(store.remove("k"), Ok(true));
    assert_eq!(store.remove("k"), Ok(false));

    assert_eq!(*events.lock(), vec!["k"]);
}

#[test]
fn test_clear_all_notifies_every_key() {
    let factory = StoreFactory::new();
    let store = open(&factory, "clear");
    store.set("x", 1).unwrap();
    store.set("y", 2).unwrap();
    let events = record(&store);

    store.clear_all().unwrap();

    let mut seen = events.lock().clone();
    seen.sort();
    assert_eq!(seen, vec!["x", "y"]);
    assert!(store.get_all_keys().is_empty());
    assert_eq!(store.size(), 0);
}

#[test]
fn test_listener_handle_remove() {
    let factory = StoreFactory::new();
    let store = open(&factory, "handle");
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let handle = store.add_on_value_changed_listener(move |key| sink.lock().push(key.to_string()));
    store.set("before", 1).unwrap();
    handle.remove();
    handle.remove();
    store.set("after", 1).unwrap();

    assert_eq!(*events.lock(), vec!["before"]);
    assert_eq!(factory.registry().listener_count("handle"), 0);
}

// =============================================================================
// Instance Sharing Tests
// =============================================================================

#[test]
fn test_same_id_shares_data_and_listeners() {
    let factory = StoreFactory::new();
    let first = open(&factory, "shared");
    let second = open(&factory, "shared");
    let events = record(&first);

    second.set("k", "v").unwrap();

    assert!(first.same_instance(&second));
    assert_eq!(first.get_string("k").as_deref(), Some("v"));
    assert_eq!(*events.lock(), vec!["k"]);
}

#[test]
fn test_different_ids_are_isolated() {
    let factory = StoreFactory::new();
    let a = open(&factory, "a");
    let b = open(&factory, "b");
    let events = record(&a);

    b.set("k", 1).unwrap();

    assert!(!a.same_instance(&b));
    assert!(!a.contains("k"));
    assert!(events.lock().is_empty());
}

#[test]
fn test_factory_lifecycle() {
    let factory = StoreFactory::new();
    assert!(!factory.exists("mmkv.default"));

    let store = factory.default_store().unwrap();
    open(&factory, "other");

    assert_eq!(store.id(), "mmkv.default");
    assert_eq!(factory.instance_ids(), vec!["mmkv.default", "other"]);

    assert!(factory.delete("other"));
    assert!(!factory.delete("other"));
    assert_eq!(
        factory.try_delete("other"),
        Err(BridgeError::InstanceNotFound("other".to_string()))
    );
    assert!(factory.try_delete("mmkv.default").is_ok());
    assert!(factory.instance_ids().is_empty());
}

#[test]
fn test_deleted_instance_starts_fresh() {
    let factory = StoreFactory::new();
    let old = open(&factory, "cycle");
    old.set("k", 1).unwrap();

    factory.delete("cycle");
    let fresh = open(&factory, "cycle");

    assert!(!fresh.contains("k"));
    assert!(!fresh.same_instance(&old));
    assert!(old.contains("k"));
}

// =============================================================================
// Marshaling Boundary Tests
// =============================================================================

#[test]
fn test_borrowed_buffer_is_copied_on_set() {
    let factory = StoreFactory::new();
    let store = open(&factory, "borrowed");
    let mut backing = vec![1u8, 2, 3];

    store.set("blob", NativeBuffer::from_borrowed(&mut backing)).unwrap();
    backing[0] = 99;

    assert_eq!(store.get_buffer("blob").unwrap().as_slice(), &[1, 2, 3]);
}

#[test]
fn test_get_buffer_returns_independent_copy() {
    let factory = StoreFactory::new();
    let store = open(&factory, "copy");
    store.set("blob", NativeBuffer::from_owned(vec![5u8; 4])).unwrap();

    let mut out = store.get_buffer("blob").unwrap();
    assert!(out.is_owner());
    out.as_mut_slice()[0] = 0;

    assert_eq!(store.get_buffer("blob").unwrap().as_slice(), &[5, 5, 5, 5]);
}

#[test]
fn test_text_handle_keys_and_values() {
    let factory = StoreFactory::new();
    let store = open(&factory, "text");
    let events = record(&store);

    let host_key = HostString::utf16("ключ");
    let host_value = HostString::ascii("plain");
    let key = TextHandle::from_external(&host_key);
    let value = TextHandle::from_external(&host_value);
    assert!(value.is_view());

    store.set(&key, value).unwrap();

    assert_eq!(store.get_string("ключ").as_deref(), Some("plain"));
    assert_eq!(*events.lock(), vec!["ключ"]);
}

#[test]
fn test_size_tracks_keys_and_values() {
    let factory = StoreFactory::new();
    let store = open(&factory, "size");

    store.set("ab", "xyz").unwrap();
    assert_eq!(store.size(), 5);

    store.set("ab", true).unwrap();
    assert_eq!(store.size(), 3);

    store.remove("ab").unwrap();
    assert_eq!(store.size(), 0);
}
