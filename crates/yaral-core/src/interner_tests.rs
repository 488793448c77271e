use crate::Interner;

#[test]
fn intern_deduplicates() {
    let mut interner = Interner::new();

    let a = interner.intern("condition");
    let b = interner.intern("condition");
    let c = interner.intern("meta");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 2);
}

#[test]
fn names_follow_insertion_order() {
    let mut interner = Interner::new();

    let z = interner.intern("z");
    let a = interner.intern("a");

    assert!(z < a);
    assert_eq!(z.index(), 0);
    assert_eq!(interner.resolve(a), "a");
}

#[test]
fn get_does_not_intern() {
    let mut interner = Interner::new();
    interner.intern("name");

    assert!(interner.get("name").is_some());
    assert!(interner.get("value").is_none());
    assert_eq!(interner.len(), 1);
}

#[test]
fn into_strings_keeps_indices() {
    let mut interner = Interner::new();
    let key = interner.intern("key");
    let value = interner.intern("value");

    let strings = interner.into_strings();
    assert_eq!(strings[key.index()], "key");
    assert_eq!(strings[value.index()], "value");
}
