use std::io::{self, Write};

/// A write-only serial line that frames are pushed onto.
///
/// `Write::flush` keeps its usual meaning (hand buffered bytes to the OS).
/// [`SerialLine::discard_output`] is the termios notion of flushing: bytes
/// queued in the driver but not yet clocked out are dropped.
pub trait SerialLine: Write {
    /// Drop output that was written but not yet transmitted.
    fn discard_output(&mut self) -> io::Result<()>;
}

impl<T: SerialLine + ?Sized> SerialLine for &mut T {
    fn discard_output(&mut self) -> io::Result<()> {
        (**self).discard_output()
    }
}

impl<T: SerialLine + ?Sized> SerialLine for Box<T> {
    fn discard_output(&mut self) -> io::Result<()> {
        (**self).discard_output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingLine {
        written: Vec<u8>,
        discards: usize,
    }

    impl Write for CountingLine {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SerialLine for CountingLine {
        fn discard_output(&mut self) -> io::Result<()> {
            self.discards += 1;
            Ok(())
        }
    }

    fn push<L: SerialLine>(mut line: L, bytes: &[u8]) {
        line.discard_output().unwrap();
        line.write_all(bytes).unwrap();
    }

    #[test]
    fn mutable_reference_forwards() {
        let mut line = CountingLine::default();
        push(&mut line, b"abc");
        assert_eq!(line.discards, 1);
        assert_eq!(line.written, b"abc");
    }

    #[test]
    fn boxed_line_forwards() {
        let mut boxed: Box<CountingLine> = Box::default();
        push(&mut boxed, b"xy");
        assert_eq!(boxed.discards, 1);
        assert_eq!(boxed.written, b"xy");
    }
}
