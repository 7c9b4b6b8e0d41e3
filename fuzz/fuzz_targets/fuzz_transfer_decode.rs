#![no_main]

use bdock_core::transfer::{PLAIN_TEXT_MIME, STRUCTURED_MIME, TransferData, decode_block_name};
use bdock_registry::BlockRegistry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (String, String, String)| {
    let (structured, plain, query) = input;
    let mut data = TransferData::new();
    data.set(STRUCTURED_MIME, structured);
    data.set(PLAIN_TEXT_MIME, plain);

    // Decoding is total: a name, or Unreadable.
    if let Ok(name) = decode_block_name(&data) {
        assert!(!name.is_empty());
        assert!(!name.chars().any(char::is_whitespace));
    }

    // Search never faults and never lists a disabled block.
    let registry = BlockRegistry::builtin();
    for blocks in registry.search(&query).values() {
        assert!(!blocks.is_empty());
        assert!(blocks.iter().all(|b| !b.disabled));
    }
});
