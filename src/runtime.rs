use std::ops::Deref;

use jni::sys::jbyte;

use crate::error::InternErr;

/// The host runtime capabilities the shim calls into.
///
/// Handles that own a runtime resource (`Class`, `ByteArray`, `Elements`)
/// give it back when dropped, so every exit path releases exactly what
/// was acquired.
pub trait HostRuntime {
    type Str;
    type Class;
    type Method;
    type ByteArray;
    type Elements<'a>: Deref<Target = [jbyte]>
    where
        Self: 'a;
    type Interned;

    fn object_class(&mut self, obj: &Self::Str) -> Result<Self::Class, InternErr>;

    fn method_id(
        &mut self,
        class: &Self::Class,
        name: &str,
        sig: &str,
    ) -> Result<Self::Method, InternErr>;

    /// Calls a `()[B` method. `Ok(None)` is a null return.
    fn call_byte_array_method(
        &mut self,
        obj: &Self::Str,
        method: &Self::Method,
    ) -> Result<Option<Self::ByteArray>, InternErr>;

    fn array_length(&mut self, array: &Self::ByteArray) -> Result<usize, InternErr>;

    fn pin_elements<'a>(
        &'a mut self,
        array: &'a Self::ByteArray,
    ) -> Result<Self::Elements<'a>, InternErr>;

    /// Drops any exception left pending by a failed call.
    fn clear_pending_exception(&mut self);

    /// The runtime's own interning primitive.
    fn intern(&mut self, obj: &Self::Str) -> Result<Self::Interned, InternErr>;
}
