//! Integration tests for primitive values and object numbering.

use pdf_scribe::array::Array;
use pdf_scribe::dictionary::Dictionary;
use pdf_scribe::name::Name;
use pdf_scribe::number::format_double;
use pdf_scribe::object::{Identity, IndirectValue, Object, ObjectRef};
use pdf_scribe::writer::{ObjectNumberAllocator, ObjectSerializer};
use pdf_scribe::Error;
use proptest::prelude::*;

fn serialize(obj: impl Into<Object>) -> String {
    ObjectSerializer::new().serialize_to_string(&obj.into()).unwrap()
}

#[test]
fn test_number_formatting() {
    assert_eq!(format_double(1.0, 6).unwrap(), "1.000000");
    assert_eq!(format_double(-0.5, 2).unwrap(), "-0.50");
    assert!(matches!(format_double(1.0, 17), Err(Error::IllegalArgument(_))));
}

#[test]
fn test_dictionary_layout_switches_at_three_entries() {
    let mut dict = Dictionary::new();
    dict.put("A", 1);
    dict.put("B", Object::name("X"));
    assert_eq!(serialize(dict.clone()), "<< /A 1 /B /X >>");

    dict.put("C", Array::from(vec![Object::Integer(1), Object::Integer(2)]));
    assert_eq!(serialize(dict), "<<\n  /A 1\n  /B /X\n  /C [1 2]\n>>");
}

#[test]
fn test_dictionary_keeps_insertion_order() {
    let mut dict = Dictionary::new();
    dict.put("Zeta", 1);
    dict.put("Alpha", 2);
    dict.put("Zeta", 3);
    let keys: Vec<String> = dict.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["/Zeta", "/Alpha"]);
    assert_eq!(dict.get("Zeta"), Some(&Object::Integer(3)));
}

#[test]
fn test_indirect_framing() {
    let bytes = ObjectSerializer::new()
        .serialize_indirect(ObjectRef::new(7, 0), &Object::from(vec![Object::Null]))
        .unwrap();
    assert_eq!(bytes, b"7 0 obj\n[null]\nendobj\n");
}

#[test]
fn test_reference_requires_number() {
    let value = IndirectValue::new(Object::Integer(1));
    assert!(matches!(
        Object::reference_to(&value),
        Err(Error::IllegalState(_))
    ));
}

proptest! {
    /// Property: every byte outside 33..=126, and '/', is written as #XX.
    #[test]
    fn name_escaping(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let escaped = Name::from_bytes(bytes.clone()).escaped();
        prop_assert!(escaped.starts_with('/'));

        let mut expected = String::from("/");
        for b in &bytes {
            if (33..=126).contains(b) && *b != b'/' {
                expected.push(*b as char);
            } else {
                expected.push_str(&format!("#{:02X}", b));
            }
        }
        prop_assert_eq!(escaped, expected);
    }

    /// Property: an assigned number never changes and is never reused.
    #[test]
    fn numbering_is_stable_and_unique(count in 1usize..200, retries in 0usize..5) {
        let mut alloc = ObjectNumberAllocator::new();
        let mut identities: Vec<Identity> = (0..count).map(|_| Identity::new()).collect();
        let mut assigned = Vec::with_capacity(count);
        for identity in identities.iter_mut() {
            assigned.push(alloc.assign(identity).unwrap());
        }
        for _ in 0..retries {
            for (identity, expected) in identities.iter_mut().zip(&assigned) {
                prop_assert!(alloc.assign(identity).is_err());
                prop_assert_eq!(identity.get(), Some(*expected));
            }
        }
        let mut ids: Vec<u32> = assigned.iter().map(|r| r.id).collect();
        ids.dedup();
        prop_assert_eq!(ids.len(), count);
        prop_assert_eq!(alloc.count() as usize, count);
    }

    /// Property: reals always use exactly `dec` decimal places and a '.' separator.
    #[test]
    fn fixed_precision(value in -1.0e6f64..1.0e6, dec in 1u8..=16) {
        let text = format_double(value, dec).unwrap();
        let (_, fraction) = text.split_once('.').unwrap();
        prop_assert_eq!(fraction.len(), dec as usize);
        prop_assert!(!text.contains(','));
    }
}
