use core::fmt;

use datumbridge_types::Oid;

use crate::dispatch::Dispatcher;
use crate::error::{ConversionError, Result};
use crate::host::TupleHeader;
use crate::raw::Datum;

use super::Value;

/// A host composite record.
///
/// Fields are not converted up front. Each access asks the host for the
/// field's type and datum and runs them through the dispatcher again, with
/// the `writable` intent the tuple itself was converted with.
#[derive(Clone)]
pub struct Tuple<'h> {
    dispatcher: Dispatcher<'h>,
    header: TupleHeader,
    writable: bool,
}

impl fmt::Debug for Tuple<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tuple")
            .field("type_oid", &self.header.type_oid)
            .field("natts", &self.header.natts)
            .field("writable", &self.writable)
            .field("depth", &self.dispatcher.depth())
            .finish()
    }
}

impl<'h> Tuple<'h> {
    /// `dispatcher` converts the fields, one nesting level below the tuple.
    pub(crate) fn new(dispatcher: Dispatcher<'h>, header: TupleHeader, writable: bool) -> Self {
        Self {
            dispatcher,
            header,
            writable,
        }
    }

    pub fn type_oid(&self) -> Oid {
        self.header.type_oid
    }

    pub fn header(&self) -> &TupleHeader {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.header.natts
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn raw_field(&self, index: usize) -> Result<(Oid, Option<Datum>)> {
        let len = self.len();
        if index >= len {
            return Err(ConversionError::FieldIndexOutOfRange { index, len });
        }
        self.dispatcher
            .contained(self.header.type_oid, |host| host.tuple_field(&self.header, index))
    }

    /// Convert the field at `index`.
    ///
    /// NULL fields and fields of unsupported scalar types convert to `None`;
    /// [`Tuple::is_null`] tells the two apart.
    pub fn field(&self, index: usize) -> Result<Option<Value<'h>>> {
        let (oid, datum) = self.raw_field(index)?;
        match datum {
            Some(datum) => self.dispatcher.convert(self.writable, oid, datum),
            None => Ok(None),
        }
    }

    /// Whether the field at `index` is NULL. No conversion takes place.
    pub fn is_null(&self, index: usize) -> Result<bool> {
        let (_, datum) = self.raw_field(index)?;
        Ok(datum.is_none())
    }

    /// Convert every field, in order.
    pub fn fields(&self) -> impl Iterator<Item = Result<Option<Value<'h>>>> + '_ {
        (0..self.len()).map(|index| self.field(index))
    }
}
