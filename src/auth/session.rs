use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

const FLASH: &str = "flash";
const FLASH_ERROR: &str = "flash_error";

/// Cookie-backed session carrying the CSRF token and flash messages.
pub fn middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .cookie_http_only(true)
        .build()
}

pub fn set_flash(session: &Session, message: &str) {
    let _ = session.insert(FLASH, message);
}

pub fn set_flash_error(session: &Session, message: &str) {
    let _ = session.insert(FLASH_ERROR, message);
}

pub fn take_flash(session: &Session) -> Option<String> {
    take(session, FLASH)
}

pub fn take_flash_error(session: &Session) -> Option<String> {
    take(session, FLASH_ERROR)
}

fn take(session: &Session, key: &str) -> Option<String> {
    let value = session.get::<String>(key).unwrap_or(None);
    if value.is_some() {
        session.remove(key);
    }
    value
}
