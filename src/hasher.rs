use digest::DynDigest;
use std::{
    fmt,
    fmt::Write,
    fs, io,
    io::{BufReader, Read},
    path::Path,
};

/// Read size for hashing; large enough that big files stream without many syscalls.
const HASH_BUF_SIZE: usize = 64 * 1024;

/// HashBox is a Box<[u8]> type that displays as lowercase hex.
///
/// `HashBox` wraps the boxed output of a `DynDigest` so it can be printed or
/// compared as a lowercase hex string.
pub struct HashBox(pub Box<[u8]>);

impl fmt::Display for HashBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hex_string = String::with_capacity(self.0.len() * 2);
        for byte in self.0.iter() {
            write!(hex_string, "{:02x}", byte)?;
        }
        f.write_str(&hex_string)
    }
}

/// Returns the hash of a single file.
///
/// The file is streamed through `hash` in fixed-size chunks, so memory use
/// does not grow with file size. The hasher is reset afterwards and can be
/// reused for the next file.
///
/// # Example
///
/// ```rust
/// use sha1::Sha1;
/// use syncdir::hasher::get_file_hash;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("abc.txt");
/// std::fs::write(&path, b"abc").unwrap();
///
/// let mut hasher = Sha1::default();
/// let hash = get_file_hash(&path, &mut hasher).unwrap();
/// assert_eq!(hash, "a9993e364706816aba3e25717850c26c9cd0d89d");
/// ```
pub fn get_file_hash<Hasher, P>(path: P, hash: &mut Hasher) -> Result<String, io::Error>
where
    Hasher: DynDigest + Clone,
    P: AsRef<Path>,
{
    let mut reader = BufReader::with_capacity(HASH_BUF_SIZE, fs::File::open(path)?);
    let mut buf = vec![0u8; HASH_BUF_SIZE];

    loop {
        let i = reader.read(&mut buf)?;
        if i == 0 {
            return Ok(HashBox(hash.finalize_reset()).to_string());
        }
        hash.update(&buf[..i]);
    }
}
