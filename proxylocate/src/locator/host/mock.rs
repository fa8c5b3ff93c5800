//! Recording in-memory host for tests.
//!
//! Models just enough of the kernel to exercise the locator: effective ids
//! with a saved-set root capability, a virtual root/cwd pair, and a file
//! table keyed by the root a path is resolved under. Every call is appended
//! to an operation log so tests can assert ordering.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Seek, Write};
use std::os::fd::{AsRawFd, BorrowedFd, OwnedFd, RawFd};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::Host;

#[derive(Debug, Clone)]
pub(crate) struct MockFile {
    pub contents: Vec<u8>,
    pub owner: u32,
    pub world_readable: bool,
}

#[derive(Debug)]
pub(crate) struct MockState {
    pub real_uid: u32,
    pub real_gid: u32,
    /// Whether the saved-set uid is 0, i.e. `seteuid(0)` is allowed.
    pub privileged: bool,
    pub euid: u32,
    pub egid: u32,
    pub root: PathBuf,
    pub cwd: PathBuf,
    /// Files keyed by `(root, absolute path within that root)`.
    pub files: HashMap<(PathBuf, PathBuf), MockFile>,
    /// Directory handles handed out by `open_dir`, by raw fd.
    pub dirs: HashMap<RawFd, PathBuf>,
    pub ops: Vec<String>,
    pub deny_chroot: bool,
    pub deny_chdir: bool,
    pub deny_open_dir: bool,
    /// Refuse `seteuid` to this uid while the effective uid is 0.
    pub deny_seteuid_to: Option<u32>,
    /// Fail every `fchdir` once the root has left `/`.
    pub fail_fchdir_in_container: bool,
    pub fail_fchdir: bool,
    pub fail_restore_chroot: bool,
    pub terminated: Option<String>,
}

/// Cloneable handle; clones share state so a test can keep one while the
/// locator owns another.
#[derive(Debug, Clone)]
pub(crate) struct MockHost {
    state: Arc<Mutex<MockState>>,
}

impl MockHost {
    /// A caller that runs as `uid`/`gid` and can regain root.
    pub fn privileged(uid: u32, gid: u32) -> Self {
        Self::with_state(uid, gid, true)
    }

    /// A caller without any way to regain root.
    pub fn unprivileged(uid: u32, gid: u32) -> Self {
        Self::with_state(uid, gid, false)
    }

    fn with_state(uid: u32, gid: u32, privileged: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                real_uid: uid,
                real_gid: gid,
                privileged,
                euid: uid,
                egid: gid,
                root: PathBuf::from("/"),
                cwd: PathBuf::from("/srv"),
                files: HashMap::new(),
                dirs: HashMap::new(),
                ops: Vec::new(),
                deny_chroot: false,
                deny_seteuid_to: None,
                deny_chdir: false,
                deny_open_dir: false,
                fail_fchdir_in_container: false,
                fail_fchdir: false,
                fail_restore_chroot: false,
                terminated: None,
            })),
        }
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Place a file under `root` (use `/` for the caller's own namespace).
    pub fn add_file(&self, root: &str, path: &str, contents: &[u8], owner: u32) {
        self.state().files.insert(
            (PathBuf::from(root), PathBuf::from(path)),
            MockFile {
                contents: contents.to_vec(),
                owner,
                world_readable: false,
            },
        );
    }

    /// Place a NUL-separated environment record for `pid` in the caller's
    /// own procfs.
    pub fn add_environ(&self, pid: i32, entries: &[&str]) {
        let mut record = Vec::new();
        for entry in entries {
            record.extend_from_slice(entry.as_bytes());
            record.push(0);
        }
        self.add_file("/", &format!("/proc/{pid}/environ"), &record, 0);
    }

    pub fn ops(&self) -> Vec<String> {
        self.state().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state().ops.clear();
    }

    /// `(euid, egid, root, cwd)` for before/after comparisons.
    pub fn snapshot(&self) -> (u32, u32, PathBuf, PathBuf) {
        let s = self.state();
        (s.euid, s.egid, s.root.clone(), s.cwd.clone())
    }
}

fn eperm() -> io::Error {
    io::Error::from_raw_os_error(libc::EPERM)
}

fn resolve(state: &MockState, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        state.cwd.join(path)
    }
}

impl Host for MockHost {
    fn geteuid(&self) -> u32 {
        self.state().euid
    }

    fn getegid(&self) -> u32 {
        self.state().egid
    }

    fn seteuid(&self, uid: u32) -> io::Result<()> {
        let mut s = self.state();
        s.ops.push(format!("seteuid({uid})"));
        if s.euid == 0 && s.deny_seteuid_to == Some(uid) {
            return Err(eperm());
        }
        if s.privileged || uid == s.real_uid || uid == s.euid {
            s.euid = uid;
            Ok(())
        } else {
            Err(eperm())
        }
    }

    fn setegid(&self, gid: u32) -> io::Result<()> {
        let mut s = self.state();
        s.ops.push(format!("setegid({gid})"));
        if s.euid == 0 || gid == s.real_gid || gid == s.egid {
            s.egid = gid;
            Ok(())
        } else {
            Err(eperm())
        }
    }

    fn open_dir(&self, path: &Path) -> io::Result<OwnedFd> {
        let mut s = self.state();
        s.ops.push(format!("open_dir({})", path.display()));
        if s.deny_open_dir {
            return Err(io::Error::from_raw_os_error(libc::EACCES));
        }
        let target = if path == Path::new(".") {
            s.cwd.clone()
        } else {
            resolve(&s, path)
        };
        let fd = OwnedFd::from(File::open("/dev/null")?);
        s.dirs.insert(fd.as_raw_fd(), target);
        Ok(fd)
    }

    fn chdir(&self, path: &Path) -> io::Result<()> {
        let mut s = self.state();
        s.ops.push(format!("chdir({})", path.display()));
        if s.deny_chdir {
            return Err(io::Error::from_raw_os_error(libc::ENOENT));
        }
        s.cwd = resolve(&s, path);
        Ok(())
    }

    fn fchdir(&self, dir: BorrowedFd<'_>) -> io::Result<()> {
        let mut s = self.state();
        let target = s
            .dirs
            .get(&dir.as_raw_fd())
            .cloned()
            .ok_or_else(|| io::Error::from_raw_os_error(libc::EBADF))?;
        s.ops.push(format!("fchdir({})", target.display()));
        if s.fail_fchdir || (s.fail_fchdir_in_container && s.root != Path::new("/")) {
            return Err(io::Error::from_raw_os_error(libc::EIO));
        }
        s.cwd = target;
        Ok(())
    }

    fn chroot(&self, path: &Path) -> io::Result<()> {
        let mut s = self.state();
        s.ops.push(format!("chroot({})", path.display()));
        if s.euid != 0 || s.deny_chroot {
            return Err(eperm());
        }
        if path == Path::new(".") {
            if s.fail_restore_chroot {
                return Err(io::Error::from_raw_os_error(libc::EIO));
            }
            s.root = s.cwd.clone();
        } else {
            s.root = resolve(&s, path);
        }
        Ok(())
    }

    fn open_read(&self, path: &Path) -> io::Result<File> {
        let mut s = self.state();
        s.ops.push(format!("open({})", path.display()));
        let key = (s.root.clone(), resolve(&s, path));
        let entry = s
            .files
            .get(&key)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        if s.euid != 0 && s.euid != entry.owner && !entry.world_readable {
            return Err(io::Error::from_raw_os_error(libc::EACCES));
        }
        let mut file = tempfile::tempfile()?;
        file.write_all(&entry.contents)?;
        file.rewind()?;
        Ok(file)
    }

    fn terminate(&self, reason: &str) -> ! {
        let mut s = self.state();
        s.ops.push("terminate".to_string());
        s.terminated = Some(reason.to_string());
        drop(s);
        panic!("terminated: {reason}");
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
