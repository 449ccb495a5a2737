//! uid/gid to name resolution with memoization.

use std::collections::HashMap;
use std::ffi::CStr;
use std::sync::Arc;

use parking_lot::Mutex;

/// Largest buffer handed to the reentrant passwd/group lookups.
const MAX_LOOKUP_BUF: usize = 1 << 20;

/// Memoizing user and group name lookups.
///
/// Lookups are get-or-compute under one lock per map: concurrent callers
/// asking for the same id wait for the first lookup instead of repeating
/// it. Ids with no database entry resolve to their decimal form.
#[derive(Default)]
pub struct NameCache {
    users:  Mutex<HashMap<u32, Arc<str>>>,
    groups: Mutex<HashMap<u32, Arc<str>>>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, uid: u32) -> Arc<str> {
        let mut users = self.users.lock();
        Arc::clone(
            users
                .entry(uid)
                .or_insert_with(|| lookup_user(uid).unwrap_or_else(|| uid.to_string()).into()),
        )
    }

    pub fn group(&self, gid: u32) -> Arc<str> {
        let mut groups = self.groups.lock();
        Arc::clone(
            groups
                .entry(gid)
                .or_insert_with(|| lookup_group(gid).unwrap_or_else(|| gid.to_string()).into()),
        )
    }
}

fn lookup_user(uid: u32) -> Option<String> {
    let mut buf = vec![0 as libc::c_char; 1024];
    loop {
        // SAFETY: `pwd` and `buf` outlive the call, `buf.len()` is its real
        // size, and `pw_name` points into `buf` which is read before reuse.
        let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut found: *mut libc::passwd = std::ptr::null_mut();
        let rc = unsafe {
            libc::getpwuid_r(uid as libc::uid_t, &mut pwd, buf.as_mut_ptr(), buf.len(), &mut found)
        };
        if rc == libc::ERANGE && buf.len() < MAX_LOOKUP_BUF {
            buf.resize(buf.len() * 2, 0);
            continue;
        }
        if rc != 0 || found.is_null() || pwd.pw_name.is_null() {
            return None;
        }
        let name = unsafe { CStr::from_ptr(pwd.pw_name) };
        return Some(name.to_string_lossy().into_owned());
    }
}

fn lookup_group(gid: u32) -> Option<String> {
    let mut buf = vec![0 as libc::c_char; 1024];
    loop {
        // SAFETY: as in `lookup_user`.
        let mut grp: libc::group = unsafe { std::mem::zeroed() };
        let mut found: *mut libc::group = std::ptr::null_mut();
        let rc = unsafe {
            libc::getgrgid_r(gid as libc::gid_t, &mut grp, buf.as_mut_ptr(), buf.len(), &mut found)
        };
        if rc == libc::ERANGE && buf.len() < MAX_LOOKUP_BUF {
            buf.resize(buf.len() * 2, 0);
            continue;
        }
        if rc != 0 || found.is_null() || grp.gr_name.is_null() {
            return None;
        }
        let name = unsafe { CStr::from_ptr(grp.gr_name) };
        return Some(name.to_string_lossy().into_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_resolves_and_is_memoized() {
        let cache = NameCache::new();
        let first = cache.user(0);
        let second = cache.user(0);
        assert_eq!(&*first, "root");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_ids_fall_back_to_numbers() {
        let cache = NameCache::new();
        assert_eq!(&*cache.user(4_000_000_001), "4000000001");
        assert_eq!(&*cache.group(4_000_000_001), "4000000001");
    }
}
