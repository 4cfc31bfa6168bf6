//! Memory protection for secret material
//!
//! Provides two hardening measures:
//!
//! 1. **Core dump prevention**: Disables core dumps via `setrlimit(RLIMIT_CORE, 0)`
//!    so that a crash never writes seed material to disk.
//!
//! 2. **Secure buffers**: [`SecureBuffer`] locks its pages via `mlock()` so the
//!    OS never swaps them out, and overwrites its contents in several passes
//!    when dropped. Drop runs on every exit path (normal return, `?` early
//!    return, unwinding panic), so the wipe does not depend on caller
//!    discipline.
//!
//! Locking is best-effort: failures are logged but never fatal, since
//! containers and unprivileged users are often not allowed to lock memory.

use std::fmt;
use std::sync::atomic::{compiler_fence, AtomicBool, Ordering};

use zeroize::Zeroize;

/// Track whether core dumps have been disabled (call only once)
static CORE_DUMPS_DISABLED: AtomicBool = AtomicBool::new(false);

/// Overwrite patterns applied before the final zeroize pass.
const WIPE_PATTERNS: [u8; 3] = [0xFF, 0xAA, 0x55];

/// Disable core dumps for the current process.
///
/// Should be called early in application startup. Returns `true` if core
/// dumps are disabled.
pub fn disable_core_dumps() -> bool {
    if CORE_DUMPS_DISABLED.swap(true, Ordering::SeqCst) {
        return true;
    }

    #[cfg(unix)]
    {
        unix::disable_core_dumps_impl()
    }

    #[cfg(not(unix))]
    {
        log::warn!("core dump prevention not supported on this platform");
        false
    }
}

/// Overwrite `data` with several patterns and finish with zeroes.
///
/// Every write goes through a volatile store so the compiler cannot elide
/// passes whose result is never read.
pub fn wipe(data: &mut [u8]) {
    if data.is_empty() {
        return;
    }
    for pattern in WIPE_PATTERNS {
        for byte in data.iter_mut() {
            // SAFETY: `byte` is a valid, aligned, exclusive reference.
            unsafe { std::ptr::write_volatile(byte, pattern) };
        }
        compiler_fence(Ordering::SeqCst);
    }
    data.zeroize();
}

/// Fixed-size container for secret bytes (seeds, private keys, chain codes).
///
/// The contents are locked in memory on creation and wiped with [`wipe`]
/// when the buffer is dropped. `Debug` never prints the contents.
pub struct SecureBuffer {
    data: Vec<u8>,
    locked: bool,
}

impl SecureBuffer {
    /// Create a zero-filled buffer of `len` bytes.
    pub fn new(len: usize) -> Self {
        let data = vec![0u8; len];
        let locked = lock(&data);
        Self { data, locked }
    }

    /// Create a buffer holding a copy of `bytes`.
    ///
    /// The caller remains responsible for its own copy.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut buf = Self::new(bytes.len());
        buf.data.copy_from_slice(bytes);
        buf
    }

    /// Move `bytes` into a new buffer, wiping the source array.
    pub fn take<const N: usize>(bytes: &mut [u8; N]) -> Self {
        let buf = Self::from_slice(&bytes[..]);
        wipe(bytes);
        buf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the pages backing this buffer are actually locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Copy the contents into a fixed-size array wrapped for zeroization.
    ///
    /// Returns `None` when the buffer length is not `N`.
    pub fn to_array<const N: usize>(&self) -> Option<zeroize::Zeroizing<[u8; N]>> {
        if self.data.len() != N {
            return None;
        }
        let mut out = zeroize::Zeroizing::new([0u8; N]);
        out.copy_from_slice(&self.data);
        Some(out)
    }
}

impl Clone for SecureBuffer {
    fn clone(&self) -> Self {
        Self::from_slice(&self.data)
    }
}

impl PartialEq for SecureBuffer {
    fn eq(&self, other: &Self) -> bool {
        if self.data.len() != other.data.len() {
            return false;
        }
        // Constant-time with respect to content.
        self.data
            .iter()
            .zip(other.data.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl Eq for SecureBuffer {}

impl fmt::Debug for SecureBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureBuffer([REDACTED; {}])", self.data.len())
    }
}

impl Drop for SecureBuffer {
    fn drop(&mut self) {
        wipe(&mut self.data);
        if self.locked && !self.data.is_empty() {
            unlock(&self.data);
        }
    }
}

fn lock(data: &[u8]) -> bool {
    if data.is_empty() {
        return true;
    }

    #[cfg(unix)]
    {
        // SAFETY: `data` is a live allocation of `data.len()` bytes.
        let locked = unsafe { unix::mlock_impl(data.as_ptr(), data.len()) };
        if !locked {
            log::warn!(
                "failed to mlock {} bytes, secret may be swappable",
                data.len()
            );
        }
        locked
    }

    #[cfg(not(unix))]
    {
        log::debug!("mlock not supported on this platform");
        false
    }
}

fn unlock(data: &[u8]) {
    #[cfg(unix)]
    {
        // SAFETY: matches the earlier `mlock` of the same region.
        unsafe {
            unix::munlock_impl(data.as_ptr(), data.len());
        }
    }

    #[cfg(not(unix))]
    {
        let _ = data;
    }
}

// ---- Platform implementations ----

#[cfg(unix)]
mod unix {
    pub fn disable_core_dumps_impl() -> bool {
        // SAFETY: setrlimit with RLIMIT_CORE=0 is a standard POSIX operation
        unsafe {
            let rlim = libc::rlimit {
                rlim_cur: 0,
                rlim_max: 0,
            };
            if libc::setrlimit(libc::RLIMIT_CORE, &rlim) != 0 {
                let errno = std::io::Error::last_os_error();
                log::warn!("failed to disable core dumps: {}", errno);
                return false;
            }
        }
        true
    }

    pub unsafe fn mlock_impl(ptr: *const u8, len: usize) -> bool {
        let result = libc::mlock(ptr as *const libc::c_void, len);
        if result != 0 {
            let errno = std::io::Error::last_os_error();
            log::debug!("mlock failed for {} bytes: {}", len, errno);
            return false;
        }
        true
    }

    pub unsafe fn munlock_impl(ptr: *const u8, len: usize) -> bool {
        libc::munlock(ptr as *const libc::c_void, len) == 0
    }
}
