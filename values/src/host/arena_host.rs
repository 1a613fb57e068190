use alloc::vec::Vec;

use bumpalo::Bump;
use datumbridge_types::{ArrayShape, Oid, ScalarKind};
use hashbrown::HashMap;

use crate::raw::Datum;
use crate::typed::Marshal;

use super::{ArrayData, ArrayHeader, Host, HostFault, TupleHeader};

// Array and tuple datums carry a tag in the high bits and a 1-based slot
// index in the low bits, so a zero word or a scalar word never decodes.
const ARRAY_TAG: u64 = 0xA11A << 48;
const TUPLE_TAG: u64 = 0x70B1 << 48;
const TAG_MASK: u64 = 0xFFFF << 48;

#[derive(Copy, Clone, Debug)]
enum CatalogEntry<'h> {
    Base,
    Array { element: Oid },
    Composite { fields: &'h [Oid] },
    // The anonymous row type; each tuple header names its concrete type.
    Record,
    Broken { message: &'h str },
}

#[derive(Copy, Clone, Debug)]
struct StoredTuple<'h> {
    type_oid: Oid,
    values: &'h [Option<Datum>],
}

/// An in-memory host runtime backed by a [`Bump`] arena.
///
/// The arena plays the role of the host's memory context: array payloads
/// and tuple bodies live there for `'h`, and views borrowed from this host
/// point straight into it. The type catalog starts out with the builtin
/// scalar types, `text`, a one-dimensional array type for each, and the
/// anonymous `record` row type.
///
/// Identifiers the catalog does not know behave like plain base types.
/// Types defined with [`ArenaHost::define_broken_type`] raise a
/// [`HostFault`] whenever they are inspected, as do datums this host did not
/// hand out.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use datumbridge_types::Oid;
/// use datumbridge_values::host::{ArenaHost, Host};
///
/// let arena = Bump::new();
/// let mut host = ArenaHost::new(&arena);
/// let (oid, datum) = host.alloc_array(&[1.0_f64, 2.0]);
///
/// assert_eq!(oid, Oid::FLOAT8_ARRAY);
/// assert!(host.type_is_array(oid));
/// assert_eq!(host.array_header(datum).shape.len(), Some(2));
/// ```
#[derive(Debug)]
pub struct ArenaHost<'h> {
    arena: &'h Bump,
    catalog: HashMap<Oid, CatalogEntry<'h>>,
    arrays: Vec<ArrayHeader<'h>>,
    tuples: Vec<StoredTuple<'h>>,
    next_oid: u32,
}

impl<'h> ArenaHost<'h> {
    pub fn new(arena: &'h Bump) -> Self {
        let mut catalog = HashMap::new();
        for kind in ScalarKind::ALL {
            catalog.insert(kind.oid(), CatalogEntry::Base);
            catalog.insert(
                kind.array_oid(),
                CatalogEntry::Array {
                    element: kind.oid(),
                },
            );
        }
        catalog.insert(Oid::TEXT, CatalogEntry::Base);
        catalog.insert(Oid::RECORD, CatalogEntry::Record);
        catalog.insert(
            Oid::TEXT_ARRAY,
            CatalogEntry::Array {
                element: Oid::TEXT,
            },
        );

        Self {
            arena,
            catalog,
            arrays: Vec::new(),
            tuples: Vec::new(),
            next_oid: Oid::FIRST_NORMAL.as_u32(),
        }
    }

    pub fn arena(&self) -> &'h Bump {
        self.arena
    }

    // --- Catalog ---

    fn define(&mut self, entry: CatalogEntry<'h>) -> Oid {
        let oid = Oid::new(self.next_oid);
        self.next_oid += 1;
        self.catalog.insert(oid, entry);
        oid
    }

    /// Define a composite type with the given field types, in order.
    pub fn define_composite(&mut self, fields: &[Oid]) -> Oid {
        let fields = self.arena.alloc_slice_copy(fields);
        self.define(CatalogEntry::Composite { fields })
    }

    /// Define an array type over an arbitrary element type.
    pub fn define_array_type(&mut self, element: Oid) -> Oid {
        self.define(CatalogEntry::Array { element })
    }

    /// Define a type whose catalog entry is corrupt: inspecting it raises
    /// a [`HostFault`] carrying `message`.
    pub fn define_broken_type(&mut self, message: &str) -> Oid {
        let message = self.arena.alloc_str(message);
        self.define(CatalogEntry::Broken { message })
    }

    /// Array type whose elements are `element`, if one is defined.
    pub fn array_type_of(&self, element: Oid) -> Option<Oid> {
        self.catalog.iter().find_map(|(oid, entry)| match entry {
            CatalogEntry::Array { element: e } if *e == element => Some(*oid),
            _ => None,
        })
    }

    // --- Storage ---

    /// Copy `elements` into the arena as a one-dimensional array without
    /// NULLs and return its builtin array type with the new datum.
    pub fn alloc_array<E: Marshal>(&mut self, elements: &[E]) -> (Oid, Datum) {
        let stored: &'h [E] = self.arena.alloc_slice_copy(elements);
        let header = ArrayHeader {
            shape: ArrayShape::vector(E::KIND.oid(), stored.len()),
            data: E::into_array_data(stored),
        };
        (E::KIND.array_oid(), self.push_array(header))
    }

    /// Store an array with an arbitrary header.
    ///
    /// The shape is taken as given and not checked against the payload, so
    /// this can describe arrays the converter must reject.
    ///
    /// # Panics
    ///
    /// Panics if `array_oid` is not an array type of this host.
    pub fn alloc_raw_array(&mut self, array_oid: Oid, shape: ArrayShape, data: ArrayData<'_>) -> Datum {
        assert!(
            matches!(self.catalog.get(&array_oid), Some(CatalogEntry::Array { .. })),
            "{array_oid} is not an array type",
        );
        let data = self.copy_data(data);
        self.push_array(ArrayHeader { shape, data })
    }

    /// Store a tuple of composite type `type_oid`; `None` is a NULL field.
    ///
    /// # Panics
    ///
    /// Panics if `type_oid` is not a composite type of this host or the
    /// number of values does not match its field count.
    pub fn alloc_tuple(&mut self, type_oid: Oid, values: &[Option<Datum>]) -> Datum {
        let Some(CatalogEntry::Composite { fields }) = self.catalog.get(&type_oid) else {
            panic!("{type_oid} is not a composite type");
        };
        assert_eq!(
            fields.len(),
            values.len(),
            "{type_oid} has {} field(s), got {} value(s)",
            fields.len(),
            values.len(),
        );
        let values = self.arena.alloc_slice_copy(values);
        self.tuples.push(StoredTuple { type_oid, values });
        Datum::from_raw(TUPLE_TAG | self.tuples.len() as u64)
    }

    fn push_array(&mut self, header: ArrayHeader<'h>) -> Datum {
        self.arrays.push(header);
        Datum::from_raw(ARRAY_TAG | self.arrays.len() as u64)
    }

    fn copy_data(&self, data: ArrayData<'_>) -> ArrayData<'h> {
        let arena = self.arena;
        match data {
            ArrayData::Bool(e) => ArrayData::Bool(arena.alloc_slice_copy(e)),
            ArrayData::Int2(e) => ArrayData::Int2(arena.alloc_slice_copy(e)),
            ArrayData::Int4(e) => ArrayData::Int4(arena.alloc_slice_copy(e)),
            ArrayData::Int8(e) => ArrayData::Int8(arena.alloc_slice_copy(e)),
            ArrayData::Float4(e) => ArrayData::Float4(arena.alloc_slice_copy(e)),
            ArrayData::Float8(e) => ArrayData::Float8(arena.alloc_slice_copy(e)),
            ArrayData::Opaque(bytes) => ArrayData::Opaque(arena.alloc_slice_copy(bytes)),
        }
    }

    // --- Decoding (may raise) ---

    fn entry(&self, oid: Oid) -> Option<CatalogEntry<'h>> {
        let entry = self.catalog.get(&oid).copied();
        if let Some(CatalogEntry::Broken { message }) = entry {
            HostFault::new(message).raise();
        }
        entry
    }

    fn slot(datum: Datum, tag: u64, len: usize, what: &str) -> usize {
        let word = datum.into_raw();
        let index = (word & !TAG_MASK) as usize;
        if word & TAG_MASK != tag || index == 0 || index > len {
            HostFault::new(alloc::format!("invalid {what} datum {datum:?}")).raise();
        }
        index - 1
    }

    fn stored_tuple(&self, datum: Datum) -> StoredTuple<'h> {
        self.tuples[Self::slot(datum, TUPLE_TAG, self.tuples.len(), "tuple")]
    }
}

impl Host for ArenaHost<'_> {
    fn type_is_rowtype(&self, oid: Oid) -> bool {
        matches!(
            self.entry(oid),
            Some(CatalogEntry::Composite { .. } | CatalogEntry::Record)
        )
    }

    fn type_is_array(&self, oid: Oid) -> bool {
        matches!(self.entry(oid), Some(CatalogEntry::Array { .. }))
    }

    fn tuple_header(&self, datum: Datum) -> TupleHeader {
        let stored = self.stored_tuple(datum);
        TupleHeader {
            type_oid: stored.type_oid,
            natts: stored.values.len(),
            datum,
        }
    }

    fn array_header(&self, datum: Datum) -> ArrayHeader<'_> {
        self.arrays[Self::slot(datum, ARRAY_TAG, self.arrays.len(), "array")].clone()
    }

    fn tuple_field(&self, tuple: &TupleHeader, index: usize) -> (Oid, Option<Datum>) {
        let stored = self.stored_tuple(tuple.datum);
        let Some(CatalogEntry::Composite { fields }) = self.entry(stored.type_oid) else {
            HostFault::new(alloc::format!("{} is not a composite type", stored.type_oid)).raise();
        };
        match (fields.get(index), stored.values.get(index)) {
            (Some(oid), Some(value)) => (*oid, *value),
            _ => HostFault::new(alloc::format!(
                "field {index} out of range for {}",
                stored.type_oid
            ))
            .raise(),
        }
    }
}
