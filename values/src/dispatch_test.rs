use core::cell::Cell;

use bumpalo::Bump;
use datumbridge_types::{ArrayFlags, ArrayShape, Oid, ScalarKind, Shape, ShapeKind, ShapeViolation};
use pretty_assertions::assert_eq;
use smallvec::smallvec;

use crate::dispatch::Dispatcher;
use crate::dynamic::{Scalar, Value};
use crate::error::ConversionError;
use crate::host::{ArenaHost, ArrayData, ArrayHeader, Host, HostFault, TupleHeader};
use crate::options::ConvertOptions;
use crate::raw::Datum;
use crate::test_utils::init_test_logging;
use crate::traits::{ArrayView, ValueView};
use crate::typed::Marshal;

fn convert<'h>(host: &'h ArenaHost<'_>, writable: bool, oid: Oid, datum: Datum) -> Value<'h> {
    Dispatcher::new(host)
        .convert(writable, oid, datum)
        .expect("conversion should succeed")
        .expect("value should be supported")
}

// =============================================================================
// Scalars
// =============================================================================

fn check_scalar<T: Marshal + PartialEq + core::fmt::Debug>(values: &[T]) {
    let arena = Bump::new();
    let host = ArenaHost::new(&arena);
    for &expected in values {
        let datum = expected.into_datum();
        let value = convert(&host, false, T::KIND.oid(), datum);

        assert_eq!(value.scalar_kind(), Some(T::KIND));
        assert_eq!(value.get::<T>().unwrap(), T::from_datum(datum));
        assert_eq!(value.get::<T>().unwrap(), expected);
    }
}

#[test]
fn bool_scalars() {
    check_scalar(&[false, true]);
}

#[test]
fn int2_scalars() {
    check_scalar(&[i16::MIN, -1, 0, 1, i16::MAX]);
}

#[test]
fn int4_scalars() {
    check_scalar(&[i32::MIN, -1, 0, 1, i32::MAX]);
}

#[test]
fn int8_scalars() {
    check_scalar(&[i64::MIN, -1, 0, 1, i64::MAX]);
}

#[test]
fn float4_scalars() {
    check_scalar(&[f32::MIN, -0.5, 0.0, f32::MIN_POSITIVE, f32::MAX]);
}

#[test]
fn float8_scalars() {
    check_scalar(&[f64::MIN, -0.5, 0.0, f64::MIN_POSITIVE, f64::MAX]);
}

#[test]
fn scalar_extraction_as_wrong_type_is_a_mismatch() {
    let arena = Bump::new();
    let host = ArenaHost::new(&arena);
    let value = convert(&host, false, Oid::INT4, Datum::from_i32(5));

    let err = value.get::<i64>().unwrap_err();
    let ConversionError::TypeMismatch { expected, found } = err else {
        panic!("expected a type mismatch, got {err:?}");
    };
    assert_eq!(expected, "int8");
    assert_eq!(found, "int4");
    assert!(value.as_array::<f64>().is_err());
    assert!(value.as_tuple().is_err());
}

#[test]
fn unsupported_scalars_convert_to_none() {
    let arena = Bump::new();
    let host = ArenaHost::new(&arena);
    let dispatcher = Dispatcher::new(&host);

    for oid in [Oid::TEXT, Oid::INVALID, Oid::new(777_777)] {
        let result = dispatcher.convert(false, oid, Datum::from_i64(1));
        assert!(matches!(result, Ok(None)), "{oid}: {result:?}");
    }
}

#[test]
fn scalars_travel_back_to_the_host() {
    let value = Value::from(Scalar::Int2(-3));
    assert_eq!(value.to_datum().unwrap(), (Oid::INT2, Datum::from_i16(-3)));

    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let (oid, datum) = host.alloc_array(&[1.0_f64]);
    let array = convert(&host, false, oid, datum);
    assert!(matches!(
        array.to_datum(),
        Err(ConversionError::TypeMismatch { .. })
    ));
}

// =============================================================================
// Arrays
// =============================================================================

#[test]
fn read_only_arrays_borrow_host_memory() {
    init_test_logging();
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let (oid, datum) = host.alloc_array(&[1.5_f64, -2.0, 3.25]);
    let ArrayData::Float8(host_elements) = host.array_header(datum).data else {
        panic!("float8 storage expected");
    };

    let mut value = convert(&host, false, oid, datum);
    assert_eq!(value.shape_kind(), ShapeKind::Array);
    assert_eq!(value.element_kind(), Some(ScalarKind::Float8));
    assert!(!value.is_writable());

    let array = value.as_array_mut::<f64>().unwrap();
    assert_eq!(array.len(), 3);
    assert_eq!(array.iter().collect::<Vec<_>>(), vec![1.5, -2.0, 3.25]);
    assert!(!array.memory().is_owned());
    assert_eq!(array.as_slice().as_ptr(), host_elements.as_ptr());

    assert!(matches!(
        array.set(0, 9.0),
        Err(ConversionError::ImmutableViolation)
    ));
    assert_eq!(array.get(0), Some(1.5));
}

#[test]
fn writable_arrays_own_a_copy() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let (oid, datum) = host.alloc_array(&[1.0_f64, 2.0]);

    let mut value = convert(&host, true, oid, datum);
    assert!(value.is_writable());

    let array = value.as_array_mut::<f64>().unwrap();
    assert!(array.memory().is_owned());
    array.set(1, 20.0).unwrap();
    assert_eq!(array.get(1), Some(20.0));
    assert!(matches!(
        array.set(2, 0.0),
        Err(ConversionError::ElementIndexOutOfRange { index: 2, len: 2 })
    ));

    // The host's copy is untouched.
    assert_eq!(host.array_header(datum).data, ArrayData::Float8(&[1.0, 2.0]));
}

#[test]
fn empty_arrays_convert() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let (oid, datum) = host.alloc_array::<f64>(&[]);

    let value = convert(&host, false, oid, datum);
    let array = value.into_array::<f64>().unwrap();
    assert!(array.is_empty());
    assert_eq!(array.get(0), None);
}

#[test]
fn two_dimensional_arrays_are_rejected() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let shape = ArrayShape {
        element: Oid::FLOAT8,
        dims: smallvec![2, 2],
        flags: ArrayFlags::empty(),
    };
    let datum = host.alloc_raw_array(
        Oid::FLOAT8_ARRAY,
        shape,
        ArrayData::Float8(&[1.0, 2.0, 3.0, 4.0]),
    );

    for writable in [false, true] {
        let err = Dispatcher::new(&host)
            .convert(writable, Oid::FLOAT8_ARRAY, datum)
            .unwrap_err();
        assert!(
            matches!(
                err,
                ConversionError::UnsupportedShape(ShapeViolation::MultiDimensional { ndim: 2 })
            ),
            "{err:?}"
        );
    }
}

#[test]
fn zero_dimensional_arrays_are_rejected() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let shape = ArrayShape {
        element: Oid::FLOAT8,
        dims: smallvec![],
        flags: ArrayFlags::empty(),
    };
    let datum = host.alloc_raw_array(Oid::FLOAT8_ARRAY, shape, ArrayData::Float8(&[]));

    let err = Dispatcher::new(&host)
        .convert(false, Oid::FLOAT8_ARRAY, datum)
        .unwrap_err();
    assert!(
        matches!(
            err,
            ConversionError::UnsupportedShape(ShapeViolation::MultiDimensional { ndim: 0 })
        ),
        "{err:?}"
    );
}

#[test]
fn arrays_with_nulls_are_rejected() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let mut shape = ArrayShape::vector(Oid::FLOAT8, 2);
    shape.flags |= ArrayFlags::HAS_NULLS;
    let datum = host.alloc_raw_array(Oid::FLOAT8_ARRAY, shape, ArrayData::Float8(&[1.0, 0.0]));

    let err = Dispatcher::new(&host)
        .convert(false, Oid::FLOAT8_ARRAY, datum)
        .unwrap_err();
    assert!(
        matches!(
            err,
            ConversionError::UnsupportedShape(ShapeViolation::ContainsNulls)
        ),
        "{err:?}"
    );
}

#[test]
fn unsupported_element_kinds_are_errors() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let (int_oid, ints) = host.alloc_array(&[1_i32, 2]);
    let texts = host.alloc_raw_array(
        Oid::TEXT_ARRAY,
        ArrayShape::vector(Oid::TEXT, 5),
        ArrayData::Opaque(b"hello"),
    );
    let dispatcher = Dispatcher::new(&host);

    let err = dispatcher.convert(false, int_oid, ints).unwrap_err();
    assert!(
        matches!(err, ConversionError::UnsupportedElementKind { element } if element == Oid::INT4),
        "{err:?}"
    );
    let err = dispatcher.convert(true, Oid::TEXT_ARRAY, texts).unwrap_err();
    assert!(
        matches!(err, ConversionError::UnsupportedElementKind { element } if element == Oid::TEXT),
        "{err:?}"
    );
}

#[test]
fn inconsistent_payloads_are_faults() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let wrong_storage = host.alloc_raw_array(
        Oid::FLOAT8_ARRAY,
        ArrayShape::vector(Oid::FLOAT8, 2),
        ArrayData::Int4(&[1, 2]),
    );
    let wrong_length = host.alloc_raw_array(
        Oid::FLOAT8_ARRAY,
        ArrayShape::vector(Oid::FLOAT8, 3),
        ArrayData::Float8(&[1.0, 2.0]),
    );
    let dispatcher = Dispatcher::new(&host);

    for datum in [wrong_storage, wrong_length] {
        let err = dispatcher.convert(false, Oid::FLOAT8_ARRAY, datum).unwrap_err();
        let ConversionError::IntrospectionFault { oid, fault } = err else {
            panic!("expected an introspection fault, got {err:?}");
        };
        assert_eq!(oid, Oid::FLOAT8_ARRAY);
        assert!(fault.message().contains("float8"), "{fault}");
    }
}

#[test]
fn typed_array_access_checks_element_type() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let (oid, datum) = host.alloc_array(&[1.0_f64]);
    let value = convert(&host, false, oid, datum);

    assert!(value.get::<f64>().is_err());
    let err = value.as_tuple().unwrap_err();
    assert_eq!(
        err.to_string(),
        "type mismatch: expected tuple, found float8[] (read-only)"
    );
}

// =============================================================================
// Tuples
// =============================================================================

#[test]
fn tuple_fields_convert_on_access() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let (_, samples) = host.alloc_array(&[0.1_f64, 0.2]);
    let row_type = host.define_composite(&[Oid::INT4, Oid::FLOAT8_ARRAY, Oid::TEXT, Oid::BOOL]);
    let row = host.alloc_tuple(
        row_type,
        &[
            Some(Datum::from_i32(12)),
            Some(samples),
            Some(Datum::from_i64(0xdead)),
            None,
        ],
    );

    let value = convert(&host, false, row_type, row);
    assert!(value.is_tuple());
    assert_eq!(value.describe(), format!("tuple of {row_type}"));

    let tuple = value.as_tuple().unwrap();
    assert_eq!(tuple.type_oid(), row_type);
    assert_eq!(tuple.len(), 4);

    let id = tuple.field(0).unwrap().unwrap();
    assert_eq!(id.get::<i32>().unwrap(), 12);

    let samples = tuple.field(1).unwrap().unwrap();
    assert!(!samples.is_writable());
    assert_eq!(samples.as_array::<f64>().unwrap().as_slice(), &[0.1, 0.2]);

    // Unsupported scalar and NULL fields have no value.
    assert!(tuple.field(2).unwrap().is_none());
    assert!(tuple.field(3).unwrap().is_none());

    assert_eq!(tuple.fields().filter(|f| matches!(f, Ok(Some(_)))).count(), 2);
}

#[test]
fn record_typed_tuples_convert_as_their_concrete_type() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let pair = host.define_composite(&[Oid::INT4, Oid::BOOL]);
    let datum = host.alloc_tuple(pair, &[Some(Datum::from_i32(8)), None]);

    let value = convert(&host, false, Oid::RECORD, datum);
    let tuple = value.as_tuple().unwrap();
    assert_eq!(tuple.type_oid(), pair);
    assert_eq!(tuple.field(0).unwrap().unwrap().get::<i32>().unwrap(), 8);
    assert_eq!(
        Dispatcher::new(&host).shape_of(Oid::RECORD, datum).unwrap(),
        Shape::Tuple(pair)
    );
}

#[test]
fn null_fields_are_distinguishable_from_unsupported_ones() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let row_type = host.define_composite(&[Oid::TEXT, Oid::INT4]);
    let row = host.alloc_tuple(row_type, &[Some(Datum::from_i64(5)), None]);

    let value = convert(&host, false, row_type, row);
    let tuple = value.as_tuple().unwrap();

    assert!(tuple.field(0).unwrap().is_none());
    assert!(tuple.field(1).unwrap().is_none());
    assert!(!tuple.is_null(0).unwrap());
    assert!(tuple.is_null(1).unwrap());
    assert!(matches!(
        tuple.is_null(2),
        Err(ConversionError::FieldIndexOutOfRange { index: 2, len: 2 })
    ));
}

#[test]
fn tuple_field_index_is_checked() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let pair = host.define_composite(&[Oid::INT8, Oid::INT8]);
    let datum = host.alloc_tuple(pair, &[Some(Datum::from_i64(1)), Some(Datum::from_i64(2))]);

    let value = convert(&host, false, pair, datum);
    let tuple = value.as_tuple().unwrap();
    for index in [2, 3, usize::MAX] {
        let err = tuple.field(index).unwrap_err();
        assert!(
            matches!(err, ConversionError::FieldIndexOutOfRange { index: i, len: 2 } if i == index),
            "{err:?}"
        );
    }
}

#[test]
fn tuples_pass_writable_intent_to_fields() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let (_, weights) = host.alloc_array(&[1.0_f64, 2.0]);
    let wrapper = host.define_composite(&[Oid::FLOAT8_ARRAY]);
    let datum = host.alloc_tuple(wrapper, &[Some(weights)]);

    let value = convert(&host, true, wrapper, datum);
    let mut field = value.as_tuple().unwrap().field(0).unwrap().unwrap();
    assert!(field.is_writable());
    field.as_array_mut::<f64>().unwrap().set(0, 5.0).unwrap();
    assert_eq!(field.as_array::<f64>().unwrap().get(0), Some(5.0));
}

#[test]
fn nested_tuples_recurse() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let inner_type = host.define_composite(&[Oid::FLOAT4]);
    let outer_type = host.define_composite(&[inner_type, Oid::INT2]);
    let inner = host.alloc_tuple(inner_type, &[Some(Datum::from_f32(2.5))]);
    let outer = host.alloc_tuple(outer_type, &[Some(inner), Some(Datum::from_i16(-4))]);

    let value = convert(&host, false, outer_type, outer);
    let outer = value.as_tuple().unwrap();
    let inner = outer.field(0).unwrap().unwrap().into_tuple().unwrap();

    assert_eq!(inner.type_oid(), inner_type);
    assert_eq!(inner.field(0).unwrap().unwrap().get::<f32>().unwrap(), 2.5);
    assert_eq!(outer.field(1).unwrap().unwrap().get::<i16>().unwrap(), -4);
}

#[test]
fn nesting_depth_is_limited() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let inner_type = host.define_composite(&[Oid::INT4]);
    let outer_type = host.define_composite(&[inner_type]);
    let inner = host.alloc_tuple(inner_type, &[Some(Datum::from_i32(1))]);
    let outer = host.alloc_tuple(outer_type, &[Some(inner)]);

    let options = ConvertOptions::default().with_max_nesting_depth(1);
    let dispatcher = Dispatcher::with_options(&host, options);
    let value = dispatcher.convert(false, outer_type, outer).unwrap().unwrap();

    let err = value.as_tuple().unwrap().field(0).unwrap_err();
    assert!(
        matches!(err, ConversionError::NestingTooDeep { limit: 1 }),
        "{err:?}"
    );

    let none_allowed = ConvertOptions::default().with_max_nesting_depth(0);
    let err = Dispatcher::with_options(&host, none_allowed)
        .convert(false, outer_type, outer)
        .unwrap_err();
    assert!(matches!(err, ConversionError::NestingTooDeep { limit: 0 }));
}

// =============================================================================
// Fault containment
// =============================================================================

#[test]
fn broken_types_surface_as_introspection_faults() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let broken = host.define_broken_type("cache lookup failed for type");

    let result = Dispatcher::new(&host).convert(false, broken, Datum::ZERO);
    let Err(ConversionError::IntrospectionFault { oid, fault }) = result else {
        panic!("expected an introspection fault, got {result:?}");
    };
    assert_eq!(oid, broken);
    assert_eq!(fault.message(), "cache lookup failed for type");
}

#[test]
fn undecodable_datums_surface_as_introspection_faults() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let pair = host.define_composite(&[Oid::INT4, Oid::INT4]);
    let dispatcher = Dispatcher::new(&host);

    for oid in [Oid::FLOAT8_ARRAY, pair] {
        let result = dispatcher.convert(false, oid, Datum::from_i64(42));
        assert!(
            matches!(result, Err(ConversionError::IntrospectionFault { oid: o, .. }) if o == oid),
            "{result:?}"
        );
    }
}

#[test]
fn dispatcher_is_usable_after_a_fault() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let broken = host.define_broken_type("corrupt catalog entry");
    let (oid, datum) = host.alloc_array(&[4.0_f64]);
    let dispatcher = Dispatcher::new(&host);

    assert!(dispatcher.convert(false, broken, Datum::ZERO).is_err());
    let value = dispatcher.convert(false, oid, datum).unwrap().unwrap();
    assert_eq!(value.as_array::<f64>().unwrap().get(0), Some(4.0));
}

/// A host that claims every type is both a row type and an array, and
/// raises from `tuple_field`.
#[derive(Default)]
struct AmbiguousHost {
    array_headers: Cell<usize>,
}

impl Host for AmbiguousHost {
    fn type_is_rowtype(&self, _oid: Oid) -> bool {
        true
    }

    fn type_is_array(&self, _oid: Oid) -> bool {
        true
    }

    fn tuple_header(&self, datum: Datum) -> TupleHeader {
        TupleHeader {
            type_oid: Oid::RECORD,
            natts: 1,
            datum,
        }
    }

    fn array_header(&self, _datum: Datum) -> ArrayHeader<'_> {
        self.array_headers.set(self.array_headers.get() + 1);
        ArrayHeader {
            shape: ArrayShape::vector(Oid::FLOAT8, 0),
            data: ArrayData::Float8(&[]),
        }
    }

    fn tuple_field(&self, _tuple: &TupleHeader, _index: usize) -> (Oid, Option<Datum>) {
        HostFault::new("could not deform tuple").raise()
    }
}

#[test]
fn tuple_check_wins_over_array_check() {
    let host = AmbiguousHost::default();
    let dispatcher = Dispatcher::new(&host);

    let shape = dispatcher.shape_of(Oid::new(90_000), Datum::ZERO).unwrap();
    assert_eq!(shape, Shape::Tuple(Oid::RECORD));

    let value = dispatcher.convert(false, Oid::new(90_000), Datum::ZERO).unwrap().unwrap();
    assert!(value.is_tuple());
    assert_eq!(host.array_headers.get(), 0);
}

#[test]
fn faults_during_field_access_are_contained() {
    let host = AmbiguousHost::default();
    let value = Dispatcher::new(&host)
        .convert(false, Oid::RECORD, Datum::ZERO)
        .unwrap()
        .unwrap();

    let err = value.as_tuple().unwrap().field(0).unwrap_err();
    let ConversionError::IntrospectionFault { oid, fault } = err else {
        panic!("expected an introspection fault, got {err:?}");
    };
    assert_eq!(oid, Oid::RECORD);
    assert_eq!(fault.message(), "could not deform tuple");

    assert!(matches!(
        value.as_tuple().unwrap().is_null(0),
        Err(ConversionError::IntrospectionFault { .. })
    ));
}

// =============================================================================
// Shape inspection
// =============================================================================

#[test]
fn shape_of_reports_descriptors() {
    let arena = Bump::new();
    let mut host = ArenaHost::new(&arena);
    let (array_oid, array) = host.alloc_array(&[1_i16, 2, 3]);
    let row_type = host.define_composite(&[Oid::INT2]);
    let row = host.alloc_tuple(row_type, &[None]);
    let dispatcher = Dispatcher::new(&host);

    assert_eq!(
        dispatcher.shape_of(Oid::INT8, Datum::from_i64(3)).unwrap(),
        Shape::Scalar(Oid::INT8)
    );
    assert_eq!(
        dispatcher.shape_of(Oid::TEXT, Datum::ZERO).unwrap(),
        Shape::Scalar(Oid::TEXT)
    );
    assert_eq!(
        dispatcher.shape_of(array_oid, array).unwrap(),
        Shape::Array(ArrayShape::vector(Oid::INT2, 3))
    );
    assert_eq!(dispatcher.shape_of(row_type, row).unwrap(), Shape::Tuple(row_type));
}
