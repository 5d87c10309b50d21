use std::{cell::RefCell, collections::HashMap, ops::Deref, rc::Rc};

use jni::sys::jbyte;

use crate::{
    error::InternErr,
    runtime::HostRuntime,
    shim::{GET_BYTES_NAME, GET_BYTES_SIG},
};

const STRING_CLASS: &str = "java/lang/String";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    ClassLookup,
    MethodLookup,
    NullBytes,
    GetBytesThrows,
    ArrayLength,
    Pin,
    HugeLength,
    NoPrimitive,
}

impl Fault {
    pub const ALL: [Fault; 9] = [
        Fault::None,
        Fault::ClassLookup,
        Fault::MethodLookup,
        Fault::NullBytes,
        Fault::GetBytesThrows,
        Fault::ArrayLength,
        Fault::Pin,
        Fault::HugeLength,
        Fault::NoPrimitive,
    ];
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub locals_acquired: usize,
    pub locals_released: usize,
    pub pins: usize,
    pub unpins: usize,
    pub intern_calls: usize,
    pub exceptions_cleared: usize,
    pub pending_exception: bool,
    pub interned_with_pending_exception: bool,
}

impl Ledger {
    pub fn balanced(&self) -> bool {
        self.locals_acquired == self.locals_released && self.pins == self.unpins
    }
}

pub struct FakeString(Vec<u8>);

/// A local reference, released when dropped.
pub struct FakeLocal<T> {
    value: T,
    ledger: Rc<RefCell<Ledger>>,
}

impl<T> Drop for FakeLocal<T> {
    fn drop(&mut self) {
        self.ledger.borrow_mut().locals_released += 1;
    }
}

pub struct FakePinned<'a> {
    bytes: &'a [jbyte],
    ledger: Rc<RefCell<Ledger>>,
}

impl<'a> Deref for FakePinned<'a> {
    type Target = [jbyte];

    fn deref(&self) -> &[jbyte] {
        self.bytes
    }
}

impl<'a> Drop for FakePinned<'a> {
    fn drop(&mut self) {
        self.ledger.borrow_mut().unpins += 1;
    }
}

/// In-memory runtime with a real intern table. Every acquisition and
/// release goes through the shared ledger.
pub struct FakeRuntime {
    ledger: Rc<RefCell<Ledger>>,
    fault: Fault,
    table: HashMap<Vec<u8>, usize>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::with_fault(Fault::None)
    }

    pub fn with_fault(fault: Fault) -> Self {
        Self {
            ledger: Rc::new(RefCell::new(Ledger::default())),
            fault,
            table: HashMap::new(),
        }
    }

    pub fn new_string(&self, s: &str) -> FakeString {
        FakeString(s.as_bytes().to_vec())
    }

    /// A string whose `getBytes()` yields `bytes` as they are, encoded in
    /// whatever charset the caller chose.
    pub fn new_raw_string(&self, bytes: &[u8]) -> FakeString {
        FakeString(bytes.to_vec())
    }

    pub fn ledger(&self) -> Ledger {
        self.ledger.borrow().clone()
    }

    /// Interns without going through the ledger, as the primitive would
    /// when called directly.
    pub fn intern_directly(&mut self, s: &str) -> usize {
        return self.intern_bytes(s.as_bytes());
    }

    pub fn intern_bytes(&mut self, bytes: &[u8]) -> usize {
        let next = self.table.len() + 1;
        return *self.table.entry(bytes.to_vec()).or_insert(next);
    }

    fn acquire<T>(&self, value: T) -> FakeLocal<T> {
        self.ledger.borrow_mut().locals_acquired += 1;
        return FakeLocal {
            value,
            ledger: self.ledger.clone(),
        };
    }
}

impl HostRuntime for FakeRuntime {
    type Str = FakeString;
    type Class = FakeLocal<&'static str>;
    type Method = &'static str;
    type ByteArray = FakeLocal<Vec<jbyte>>;
    type Elements<'a> = FakePinned<'a>;
    type Interned = usize;

    fn object_class(&mut self, _obj: &FakeString) -> Result<Self::Class, InternErr> {
        if self.fault == Fault::ClassLookup {
            return Err(InternErr::ClassNotFound("no class".into()));
        }
        return Ok(self.acquire(STRING_CLASS));
    }

    fn method_id(
        &mut self,
        class: &Self::Class,
        name: &str,
        sig: &str,
    ) -> Result<Self::Method, InternErr> {
        if self.fault == Fault::MethodLookup || name != GET_BYTES_NAME || sig != GET_BYTES_SIG {
            return Err(InternErr::MethodNotFound(format!(
                "{}.{}{}",
                class.value, name, sig
            )));
        }
        return Ok(GET_BYTES_NAME);
    }

    fn call_byte_array_method(
        &mut self,
        obj: &FakeString,
        _method: &Self::Method,
    ) -> Result<Option<Self::ByteArray>, InternErr> {
        match self.fault {
            Fault::NullBytes => return Ok(None),
            Fault::GetBytesThrows => {
                self.ledger.borrow_mut().pending_exception = true;
                return Err(InternErr::NullByteArray("OutOfMemoryError".into()));
            }
            _ => {}
        }
        let bytes = obj.0.iter().map(|b| *b as jbyte).collect();
        return Ok(Some(self.acquire(bytes)));
    }

    fn array_length(&mut self, array: &Self::ByteArray) -> Result<usize, InternErr> {
        return match self.fault {
            Fault::ArrayLength => Err(InternErr::ArrayLength("not an array".into())),
            Fault::HugeLength => Ok(usize::MAX / 2),
            _ => Ok(array.value.len()),
        };
    }

    fn pin_elements<'a>(
        &'a mut self,
        array: &'a Self::ByteArray,
    ) -> Result<Self::Elements<'a>, InternErr> {
        if self.fault == Fault::Pin {
            return Err(InternErr::PinFailed("pin refused".into()));
        }
        self.ledger.borrow_mut().pins += 1;
        return Ok(FakePinned {
            bytes: &array.value,
            ledger: self.ledger.clone(),
        });
    }

    fn clear_pending_exception(&mut self) {
        let mut ledger = self.ledger.borrow_mut();
        if ledger.pending_exception {
            ledger.pending_exception = false;
            ledger.exceptions_cleared += 1;
        }
    }

    fn intern(&mut self, obj: &FakeString) -> Result<usize, InternErr> {
        {
            let mut ledger = self.ledger.borrow_mut();
            ledger.intern_calls += 1;
            if ledger.pending_exception {
                ledger.interned_with_pending_exception = true;
            }
        }
        if self.fault == Fault::NoPrimitive {
            return Err(InternErr::PrimitiveUnavailable("symbol not found".into()));
        }
        return Ok(self.intern_bytes(&obj.0));
    }
}
