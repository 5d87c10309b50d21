use jni::{objects::JString, sys::jstring, JNIEnv};

use crate::{config::InternConfig, shim::InternShim};

use super::jni::JniRuntime;

#[allow(non_snake_case)]
#[no_mangle]
pub extern "system" fn Java_java_lang_String_intern<'local>(
    mut env: JNIEnv<'local>,
    obj_ref: JString<'local>,
) -> jstring {
    let config = InternConfig::global();
    let mut shim = InternShim::new(config, std::io::stdout(), std::io::stderr());
    let result = shim.intern(&mut JniRuntime::new(&mut env), &obj_ref);
    return match result {
        Ok(interned) => interned,
        Err(e) => {
            log::error!("Java_java_lang_String_intern failed: {}", e.detail());
            shim.report(&e);
            if let Err(throw_err) = env.throw_new("java/lang/UnsatisfiedLinkError", e.to_string()) {
                log::error!("cannot throw UnsatisfiedLinkError: {}", throw_err);
            }
            std::ptr::null_mut()
        }
    };
}
