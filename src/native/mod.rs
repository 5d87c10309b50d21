use std::ffi::c_void;

use ::jni::{
    sys::{jint, JNI_VERSION_1_8},
    JavaVM, NativeMethod,
};

use crate::config::InternConfig;

#[allow(non_snake_case)]
mod java_lang_String;
pub(crate) mod jni;

pub use java_lang_String::Java_java_lang_String_intern;

const STRING_CLASS: &str = "java/lang/String";
const INTERN_NAME: &str = "intern";
const INTERN_SIG: &str = "()Ljava/lang/String;";

#[allow(non_snake_case)]
#[no_mangle]
pub extern "system" fn JNI_OnLoad(vm: *mut ::jni::sys::JavaVM, _reserved: *mut c_void) -> jint {
    let config = InternConfig::global();
    if !config.rebind_on_load() {
        log::debug!("JNI_OnLoad: keeping existing {}.{} binding", STRING_CLASS, INTERN_NAME);
        return JNI_VERSION_1_8;
    }
    let vm = match unsafe { JavaVM::from_raw(vm) } {
        Ok(vm) => vm,
        Err(e) => {
            log::error!("JNI_OnLoad: invalid JavaVM {:#?}", e);
            return JNI_VERSION_1_8;
        }
    };
    if let Err(e) = rebind_string_intern(&vm) {
        log::error!("JNI_OnLoad: cannot rebind {}.{} {:#?}", STRING_CLASS, INTERN_NAME, e);
    }
    return JNI_VERSION_1_8;
}

fn rebind_string_intern(vm: &JavaVM) -> ::jni::errors::Result<()> {
    let mut env = vm.get_env()?;
    let methods = [NativeMethod {
        name: INTERN_NAME.into(),
        sig: INTERN_SIG.into(),
        fn_ptr: Java_java_lang_String_intern as *mut c_void,
    }];
    if let Err(e) = env.register_native_methods(STRING_CLASS, &methods) {
        if env.exception_check()? {
            env.exception_clear()?;
        }
        return Err(e);
    }
    log::debug!("JNI_OnLoad: {}.{} rebound", STRING_CLASS, INTERN_NAME);
    return Ok(());
}
