/// アップロード対象のバイト列
///
/// ディスク上のファイルは範囲読み込みで、メモリ上のバッファはスライスで
/// チャンクを切り出す。ファイル全体をメモリに載せることはしない。
use std::io::{self, SeekFrom};
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

#[derive(Debug, Clone)]
pub enum FileSource {
    /// ディスク上のファイル
    Disk(PathBuf),
    /// メモリ上のバッファ
    Memory(Arc<[u8]>),
}

impl FileSource {
    pub fn memory(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Memory(bytes.into())
    }

    /// `range` のバイト列を読み出す
    ///
    /// # Errors
    /// 範囲がソースの末尾を超える場合は `UnexpectedEof`。
    pub async fn slice(&self, range: Range<u64>) -> io::Result<Vec<u8>> {
        let len = usize::try_from(range.end.saturating_sub(range.start))
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "chunk too large"))?;

        match self {
            Self::Disk(path) => {
                let mut file = File::open(path).await?;
                file.seek(SeekFrom::Start(range.start)).await?;
                let mut buf = vec![0u8; len];
                file.read_exact(&mut buf).await?;
                Ok(buf)
            }
            Self::Memory(bytes) => {
                let start = usize::try_from(range.start)
                    .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "offset overflow"))?;
                bytes
                    .get(start..start + len)
                    .map(<[u8]>::to_vec)
                    .ok_or_else(|| {
                        io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            format!("range {}..{} is out of bounds", range.start, range.end),
                        )
                    })
            }
        }
    }
}
