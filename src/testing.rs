//! In-memory stand-ins for the network, shared by unit tests.

use std::{
    cell::Cell,
    collections::HashMap,
    io::{self, Read},
};

use crate::{
    outside::{http::RemoteStream, PageFetcher},
    result::{Error, Result},
};

/// A body that hands out some bytes and then fails, like a dropped connection
pub struct BrokenBody {
    data: io::Cursor<Vec<u8>>,
}

impl Read for BrokenBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")),
            n => Ok(n),
        }
    }
}

enum File {
    Complete { bytes: Vec<u8>, announce_len: bool },
    Broken(Vec<u8>),
}

#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    files: HashMap<String, File>,
    calls: Cell<usize>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_owned(), html.to_owned());
        self
    }

    pub fn with_file(mut self, url: &str, bytes: &[u8], announce_len: bool) -> Self {
        self.files.insert(
            url.to_owned(),
            File::Complete {
                bytes: bytes.to_vec(),
                announce_len,
            },
        );
        self
    }

    pub fn with_broken_file(mut self, url: &str, partial: &[u8]) -> Self {
        self.files.insert(url.to_owned(), File::Broken(partial.to_vec()));
        self
    }

    /// How many requests went "over the network"
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl PageFetcher for FakeFetcher {
    fn fetch_html(&self, url: &str) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        self.pages.get(url).cloned().ok_or_else(|| Error::Remote {
            url: url.to_owned(),
            status: 404,
        })
    }

    fn open_stream(&self, url: &str) -> Result<RemoteStream> {
        self.calls.set(self.calls.get() + 1);
        match self.files.get(url) {
            Some(File::Complete {
                bytes,
                announce_len,
            }) => Ok(RemoteStream {
                content_length: announce_len.then_some(bytes.len() as u64),
                body: Box::new(io::Cursor::new(bytes.clone())),
            }),
            Some(File::Broken(partial)) => Ok(RemoteStream {
                content_length: None,
                body: Box::new(BrokenBody {
                    data: io::Cursor::new(partial.clone()),
                }),
            }),
            None => Err(Error::Remote {
                url: url.to_owned(),
                status: 404,
            }),
        }
    }
}
