use std::io::Write;

use crate::{config::InternConfig, error::InternErr, runtime::HostRuntime};

pub const ECHO_PREFIX: &str = "Interning string: ";
pub const GET_BYTES_NAME: &str = "getBytes";
pub const GET_BYTES_SIG: &str = "()[B";

/// Echoes a string's bytes before handing it to the runtime's interning
/// primitive. The echo is best effort and never decides whether the
/// primitive runs.
///
/// Each line goes out in a single `write_all`, so lines from concurrent
/// calls sharing a process stream do not tear.
pub struct InternShim<'c, O: Write, E: Write> {
    config: &'c InternConfig,
    out: O,
    err: E,
}

impl<'c, O: Write, E: Write> InternShim<'c, O, E> {
    pub fn new(config: &'c InternConfig, out: O, err: E) -> Self {
        Self { config, out, err }
    }

    pub fn intern<R: HostRuntime>(
        &mut self,
        rt: &mut R,
        obj: &R::Str,
    ) -> Result<R::Interned, InternErr> {
        if self.config.echo() {
            if let Err(e) = self.echo(rt, obj) {
                log::debug!("intern echo skipped: {}", e.detail());
                self.report(&e);
                rt.clear_pending_exception();
            }
        }
        return rt.intern(obj);
    }

    pub fn report(&mut self, e: &InternErr) {
        let line = format!("{}\n", e);
        if let Err(io_err) = self.err.write_all(line.as_bytes()) {
            log::debug!("cannot write diagnostic: {}", io_err);
        }
    }

    #[cfg(test)]
    pub(crate) fn into_streams(self) -> (O, E) {
        (self.out, self.err)
    }

    fn echo<R: HostRuntime>(&mut self, rt: &mut R, obj: &R::Str) -> Result<(), InternErr> {
        let buf = copy_string_bytes(rt, obj)?;
        // bytes go out as the runtime encoded them, up to the terminator
        let end = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());
        let text = &buf[..end];
        log::trace!("interning {} bytes", text.len());
        let mut line = Vec::with_capacity(ECHO_PREFIX.len() + text.len() + 1);
        line.extend_from_slice(ECHO_PREFIX.as_bytes());
        line.extend_from_slice(text);
        line.push(b'\n');
        if let Err(io_err) = self.out.write_all(&line) {
            log::debug!("cannot write intern echo: {}", io_err);
        }
        return Ok(());
    }
}

/// Copies the `getBytes()` contents of `obj` into a NUL terminated buffer.
///
/// Runtime handles acquired on the way are released before returning,
/// whether the copy succeeds or not.
pub fn copy_string_bytes<R: HostRuntime>(
    rt: &mut R,
    obj: &R::Str,
) -> Result<Vec<u8>, InternErr> {
    let class = rt.object_class(obj)?;
    let get_bytes = rt.method_id(&class, GET_BYTES_NAME, GET_BYTES_SIG)?;
    let array = match rt.call_byte_array_method(obj, &get_bytes)? {
        Some(array) => array,
        None => return Err(InternErr::NullByteArray("getBytes returned null".into())),
    };
    let length = rt.array_length(&array)?;
    let elements = rt.pin_elements(&array)?;

    let size = length
        .checked_add(1)
        .ok_or(InternErr::AllocFailed(usize::MAX))?;
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|_| InternErr::AllocFailed(size))?;
    let copied = length.min(elements.len());
    buf.extend(elements[..copied].iter().map(|b| *b as u8));
    buf.push(0);
    return Ok(buf);
}
