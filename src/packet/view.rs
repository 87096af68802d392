use crate::error::{DissectError, Result, Stage};

/// Bounded cursor over captured bytes.
///
/// Every decoder reads through this type. A read that would move the cursor
/// past `total_length` fails with [`DissectError::TruncatedPacket`] tagged
/// with the current stage; nothing is ever clamped.
#[derive(Debug, Clone)]
pub struct PacketView<'a> {
    data: &'a [u8],
    cursor: usize,
    stage: Stage,
}

impl<'a> PacketView<'a> {
    /// `captured_len` may be smaller than `bytes.len()` when the capture
    /// source hands over a larger buffer than it filled.
    pub fn new(bytes: &'a [u8], captured_len: usize) -> Self {
        let total_length = captured_len.min(bytes.len());
        Self {
            data: &bytes[..total_length],
            cursor: 0,
            stage: Stage::Ethernet,
        }
    }

    pub fn enter(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn total_length(&self) -> usize {
        self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    pub fn truncated(&self) -> DissectError {
        DissectError::TruncatedPacket { stage: self.stage }
    }

    /// Fails unless at least `n` bytes remain.
    pub fn require(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(self.truncated());
        }
        Ok(())
    }

    pub fn read_fixed(&mut self, n: usize) -> Result<&'a [u8]> {
        self.require(n)?;
        let bytes = &self.data[self.cursor..self.cursor + n];
        self.cursor += n;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_fixed(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_fixed(n).map(|_| ())
    }

    /// Moves the cursor to an absolute offset inside the view.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(self.truncated());
        }
        self.cursor = offset;
        Ok(())
    }

    /// Reads at an absolute offset without moving the cursor.
    pub fn peek_u16_be(&self, offset: usize) -> Result<u16> {
        let bytes = self.peek(offset, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn peek_u32_be(&self, offset: usize) -> Result<u32> {
        let bytes = self.peek(offset, 4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn peek(&self, offset: usize, n: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(n)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| self.truncated())
    }

    /// The unread tail.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.cursor..]
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_and_stop_at_the_end() {
        let bytes = [0x12, 0x34, 0xde, 0xad, 0xbe, 0xef, 0x01];
        let mut view = PacketView::new(&bytes, bytes.len());

        assert_eq!(view.read_u16_be().unwrap(), 0x1234);
        assert_eq!(view.read_u32_be().unwrap(), 0xdead_beef);
        assert_eq!(view.remaining(), 1);
        assert_eq!(view.read_u8().unwrap(), 0x01);
        assert_eq!(view.remaining(), 0);
        assert!(view.read_u8().is_err());
    }

    #[test]
    fn failed_read_does_not_move_the_cursor() {
        let bytes = [1, 2, 3];
        let mut view = PacketView::new(&bytes, 3);
        view.enter(Stage::Udp);
        view.skip(1).unwrap();

        let err = view.read_fixed(3).unwrap_err();
        assert_eq!(err, DissectError::TruncatedPacket { stage: Stage::Udp });
        assert_eq!(view.position(), 1);
        assert_eq!(view.rest(), &[2, 3]);
    }

    #[test]
    fn captured_len_bounds_the_view() {
        let bytes = [0u8; 32];
        let view = PacketView::new(&bytes, 10);
        assert_eq!(view.total_length(), 10);

        let oversized = PacketView::new(&bytes[..4], 100);
        assert_eq!(oversized.total_length(), 4);
    }

    #[test]
    fn peeks_are_absolute_and_bounded() {
        let bytes = [0, 0, 0xab, 0xcd, 0x00, 0x01];
        let view = PacketView::new(&bytes, bytes.len());

        assert_eq!(view.peek_u16_be(2).unwrap(), 0xabcd);
        assert_eq!(view.peek_u32_be(2).unwrap(), 0xabcd_0001);
        assert!(view.peek_u16_be(5).is_err());
        assert!(view.peek_u32_be(usize::MAX).is_err());
        assert_eq!(view.position(), 0);
    }

    #[test]
    fn seek_past_the_end_is_rejected() {
        let bytes = [0u8; 4];
        let mut view = PacketView::new(&bytes, 4);
        assert!(view.seek(4).is_ok());
        assert!(view.seek(5).is_err());
        assert_eq!(view.position(), 4);
    }
}
