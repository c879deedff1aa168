use std::io::{Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::Error;

pub trait MarshalSize {
    fn marshal_size(&self) -> usize;
}

pub trait Marshal: MarshalSize {
    fn marshal_to(&self, buf: &mut [u8]) -> Result<usize, Error>;

    fn marshal(&self) -> Result<Bytes, Error> {
        let mut buf = BytesMut::with_capacity(self.marshal_size());
        buf.resize(self.marshal_size(), 0);
        let n = self.marshal_to(&mut buf)?;
        buf.truncate(n);
        Ok(buf.freeze())
    }
}

pub trait Unmarshal: Sized {
    fn unmarshal<B>(buf: &mut B) -> Result<Self, Error>
    where
        B: Buf;
}

/// A fixed-capacity scratch buffer callers can reuse across `marshal_to`
/// calls to avoid reallocating per packet on the hot send path.
pub struct ExactSizeBuf {
    inner: BytesMut,
}

impl ExactSizeBuf {
    pub fn new(size: usize) -> Self {
        let mut inner = BytesMut::with_capacity(size);
        inner.resize(size, 0);
        ExactSizeBuf { inner }
    }

    pub fn as_mut(&mut self) -> &mut [u8] {
        &mut self.inner
    }
}

impl Read for ExactSizeBuf {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = buf.len().min(self.inner.remaining());
        self.inner.copy_to_slice(&mut buf[..n]);
        Ok(n)
    }
}

impl Write for ExactSizeBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
