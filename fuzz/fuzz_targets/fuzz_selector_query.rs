#![no_main]

use bdock_web::{DomHost, MemoryDom};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (String, Vec<(u8, String)>)| {
    let (selector, attrs) = input;
    let mut dom = MemoryDom::new();
    let body = dom.body(dom.top_document());
    let root = dom.append_new(body, "div");
    let mut parent = root;
    for (depth, value) in attrs.iter().take(32) {
        let element = dom.append_new(if depth % 2 == 0 { root } else { parent }, "div");
        dom.set_attribute(element, "data-block", value);
        dom.add_class(element, value);
        parent = element;
    }

    let all = dom.query_all(root, &selector);
    assert_eq!(dom.query(root, &selector), all.first().copied());
    for element in all {
        assert!(dom.contains(root, element));
        assert_ne!(element, root);
    }
});
