// Unix/Linux helpers: statvfs for the root filesystem, /proc/net/route for the
// default-route interface.

use super::FilesystemUsage;
use std::io;

/// RTF_UP from <linux/route.h>.
const RTF_UP: u32 = 0x1;

const ROUTE_TABLE: &str = "/proc/net/route";

/// Block counts of the filesystem containing `path`, in bytes.
#[cfg(unix)]
pub(super) fn statvfs(path: &str) -> io::Result<FilesystemUsage> {
    let c_path =
        std::ffi::CString::new(path).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut stat = std::mem::MaybeUninit::<libc::statvfs>::zeroed();
    // SAFETY: c_path is NUL-terminated and stat points to writable storage of
    // the right type.
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: statvfs returned 0, so the struct is initialized.
    let stat = unsafe { stat.assume_init() };
    #[allow(clippy::unnecessary_cast)]
    let (blocks, bfree, bavail, frsize) = (
        stat.f_blocks as u64,
        stat.f_bfree as u64,
        stat.f_bavail as u64,
        stat.f_frsize as u64,
    );
    Ok(FilesystemUsage {
        total: blocks.saturating_mul(frsize),
        free: bfree.saturating_mul(frsize),
        available: bavail.saturating_mul(frsize),
    })
}

#[cfg(not(unix))]
pub(super) fn statvfs(_path: &str) -> io::Result<FilesystemUsage> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "statvfs is only available on unix",
    ))
}

/// Interface carrying the default route, read from /proc/net/route.
pub(super) fn primary_interface() -> io::Result<Option<String>> {
    let table = std::fs::read_to_string(ROUTE_TABLE)?;
    Ok(default_route_interface(&table))
}

/// Picks the up default route (destination 00000000) with the lowest metric
/// from /proc/net/route text.
pub(super) fn default_route_interface(table: &str) -> Option<String> {
    table
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            // Iface Destination Gateway Flags RefCnt Use Metric ...
            if cols.len() < 7 || cols[1] != "00000000" {
                return None;
            }
            let flags = u32::from_str_radix(cols[3], 16).ok()?;
            if flags & RTF_UP == 0 {
                return None;
            }
            let metric: u32 = cols[6].parse().ok()?;
            Some((metric, cols[0]))
        })
        .min_by_key(|(metric, _)| *metric)
        .map(|(_, iface)| iface.to_string())
}
