use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
pub const OUTPUT_EXTENSION: &str = "csv";

/// True when the file starts with the gzip magic number. Short files are
/// simply not archives.
pub fn is_gzip(path: &Path) -> io::Result<bool> {
    let mut signature = Vec::with_capacity(GZIP_MAGIC.len());
    File::open(path)?
        .take(GZIP_MAGIC.len() as u64)
        .read_to_end(&mut signature)?;
    Ok(signature == GZIP_MAGIC)
}

/// Decompressed raw lines of a (possibly multi-member) gzip archive. Bytes
/// are not checked for UTF-8 here; only decoder failures surface as errors.
pub fn read_lines(path: &Path) -> io::Result<io::Split<BufReader<MultiGzDecoder<File>>>> {
    let file = File::open(path)?;
    Ok(BufReader::new(MultiGzDecoder::new(file)).split(b'\n'))
}

/// `tweets.jsonl.gz` in `out/` becomes `out/tweets.csv`.
pub fn output_path_for(source: &Path, output_dir: &Path) -> PathBuf {
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name.trim_start_matches('.').to_string(),
    };
    output_dir.join(format!("{}.{}", stem, OUTPUT_EXTENSION))
}
