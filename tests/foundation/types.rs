//! Integration tests for element types and data descriptions

use arbor_foundation::{DataType, Element, TypeId};

#[test]
fn type_names_parse_back() {
    for t in TypeId::ALL {
        assert_eq!(TypeId::from_name(t.name()), Some(t));
    }
    assert_eq!(TypeId::from_name("empty"), Some(TypeId::NoType));
    assert_eq!(TypeId::from_name("complex128"), None);
}

#[test]
fn element_sizes() {
    assert_eq!(TypeId::Char8Str.bytes_per_element(), 1);
    assert_eq!(TypeId::Int16.bytes_per_element(), 2);
    assert_eq!(TypeId::Float32.bytes_per_element(), 4);
    assert_eq!(TypeId::UInt64.bytes_per_element(), 8);
    assert_eq!(TypeId::NoType.bytes_per_element(), 0);
}

#[test]
fn shaped_description_counts_elements() {
    let dtype = DataType::with_shape(TypeId::Float32, &[3, 4]);
    assert_eq!(dtype.num_dimensions(), 2);
    assert_eq!(dtype.num_elements(), 12);
    assert_eq!(dtype.total_bytes(), 48);
    assert!(dtype.is_compact());
}

#[test]
fn offset_and_stride_extend_the_span() {
    let dtype = DataType::int32(3).with_offset(1).with_stride(2);
    assert_eq!(dtype.total_bytes(), 12);
    assert_eq!(dtype.span_bytes(), (1 + 2 * 2 + 1) * 4);
    assert_eq!(dtype.element_byte_offset(2), 20);
    assert!(!dtype.is_compact());
}

#[test]
fn validation() {
    assert!(DataType::float64(2).validate().is_ok());
    assert!(DataType::empty().validate().is_err());
    assert!(DataType::float64(2).with_stride(0).validate().is_err());
}

#[test]
fn elements_use_native_byte_order() {
    let mut bytes = [0u8; 8];
    1.25f64.write_ne(&mut bytes);
    assert_eq!(bytes, 1.25f64.to_ne_bytes());
    assert_eq!(f64::read_ne(&bytes), 1.25);
    assert_eq!(<i32 as Element>::TYPE_ID, TypeId::Int32);
}

#[test]
fn display_shows_type_and_shape() {
    assert_eq!(DataType::with_shape(TypeId::Int8, &[2, 5]).to_string(), "int8[2x5]");
}
