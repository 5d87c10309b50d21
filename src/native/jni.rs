use std::sync::OnceLock;

use jni::{
    objects::{AutoElements, AutoLocal, JByteArray, JClass, JMethodID, JString, ReleaseMode},
    signature::ReturnType,
    sys::{jbyte, jstring},
    JNIEnv,
};
use libloading::Library;

use crate::{error::InternErr, runtime::HostRuntime};

pub(crate) const INTERN_SYMBOL: &[u8] = b"JVM_InternString\0";

type InternStringFn = unsafe extern "system" fn(*mut jni::sys::JNIEnv, jstring) -> jstring;

struct InternPrimitive {
    _lib: Library,
    intern_string: InternStringFn,
}

static INTERN_PRIMITIVE: OnceLock<Result<InternPrimitive, String>> = OnceLock::new();

/// `HostRuntime` over a live `JNIEnv`.
pub(crate) struct JniRuntime<'env, 'local> {
    env: &'env mut JNIEnv<'local>,
}

impl<'env, 'local> JniRuntime<'env, 'local> {
    pub fn new(env: &'env mut JNIEnv<'local>) -> Self {
        Self { env }
    }
}

impl<'env, 'local> HostRuntime for JniRuntime<'env, 'local> {
    type Str = JString<'local>;
    type Class = AutoLocal<'local, JClass<'local>>;
    type Method = JMethodID;
    type ByteArray = AutoLocal<'local, JByteArray<'local>>;
    type Elements<'a> = AutoElements<'local, 'local, 'a, jbyte>
    where
        Self: 'a;
    type Interned = jstring;

    fn object_class(&mut self, obj: &JString<'local>) -> Result<Self::Class, InternErr> {
        let class = self
            .env
            .get_object_class(obj)
            .map_err(|e| InternErr::ClassNotFound(e.to_string()))?;
        return Ok(self.env.auto_local(class));
    }

    fn method_id(
        &mut self,
        class: &Self::Class,
        name: &str,
        sig: &str,
    ) -> Result<JMethodID, InternErr> {
        return self
            .env
            .get_method_id(&**class, name, sig)
            .map_err(|e| InternErr::MethodNotFound(format!("{}{}: {}", name, sig, e)));
    }

    fn call_byte_array_method(
        &mut self,
        obj: &JString<'local>,
        method: &JMethodID,
    ) -> Result<Option<Self::ByteArray>, InternErr> {
        let value = unsafe {
            self.env
                .call_method_unchecked(obj, *method, ReturnType::Array, &[])
        }
        .map_err(|e| InternErr::NullByteArray(e.to_string()))?;
        let bytes = value
            .l()
            .map_err(|e| InternErr::NullByteArray(e.to_string()))?;
        if bytes.is_null() {
            return Ok(None);
        }
        return Ok(Some(self.env.auto_local(JByteArray::from(bytes))));
    }

    fn array_length(&mut self, array: &Self::ByteArray) -> Result<usize, InternErr> {
        let length = self
            .env
            .get_array_length(&**array)
            .map_err(|e| InternErr::ArrayLength(e.to_string()))?;
        return usize::try_from(length)
            .map_err(|_| InternErr::ArrayLength(format!("negative length {}", length)));
    }

    fn pin_elements<'a>(
        &'a mut self,
        array: &'a Self::ByteArray,
    ) -> Result<Self::Elements<'a>, InternErr> {
        // read only, nothing to copy back on release
        return unsafe { self.env.get_array_elements(&**array, ReleaseMode::NoCopyBack) }
            .map_err(|e| InternErr::PinFailed(e.to_string()));
    }

    fn clear_pending_exception(&mut self) {
        match self.env.exception_check() {
            Ok(true) => {
                if let Err(e) = self.env.exception_clear() {
                    log::error!("cannot clear pending exception: {}", e);
                }
            }
            Ok(false) => {}
            Err(e) => log::error!("cannot check pending exception: {}", e),
        }
    }

    fn intern(&mut self, obj: &JString<'local>) -> Result<jstring, InternErr> {
        let intern_string = intern_primitive()?;
        return Ok(unsafe { intern_string(self.env.get_raw(), obj.as_raw()) });
    }
}

fn intern_primitive() -> Result<InternStringFn, InternErr> {
    let resolved = INTERN_PRIMITIVE.get_or_init(|| match resolve_intern_primitive() {
        Ok(primitive) => Ok(primitive),
        Err(e) => {
            log::error!("JVM_InternString lookup failed {:#?}", e);
            Err(e.to_string())
        }
    });
    return match resolved {
        Ok(primitive) => Ok(primitive.intern_string),
        Err(detail) => Err(InternErr::PrimitiveUnavailable(detail.clone())),
    };
}

fn resolve_intern_primitive() -> Result<InternPrimitive, libloading::Error> {
    let lib = open_jvm_image()?;
    let intern_string: InternStringFn = unsafe { *lib.get::<InternStringFn>(INTERN_SYMBOL)? };
    log::debug!("resolved JVM_InternString at {:p}", intern_string as *const u8);
    return Ok(InternPrimitive {
        _lib: lib,
        intern_string,
    });
}

#[cfg(unix)]
fn open_jvm_image() -> Result<Library, libloading::Error> {
    // libjvm is loaded RTLD_GLOBAL by the launcher
    return Ok(libloading::os::unix::Library::this().into());
}

#[cfg(windows)]
fn open_jvm_image() -> Result<Library, libloading::Error> {
    return libloading::os::windows::Library::open_already_loaded("jvm.dll").map(Into::into);
}
