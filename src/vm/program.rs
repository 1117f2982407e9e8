// Program image: little-endian 16-bit words loaded verbatim at address 0

use std::io::{ErrorKind, Read};

use super::error::LoadError;
use crate::config::MEMORY_SIZE;

/// The initial contents of VM memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramImage {
    words: Vec<u16>,
}

impl ProgramImage {
    /// Decodes a byte stream as little-endian words until end of input.
    ///
    /// A dangling odd byte is reported as [`LoadError::TruncatedWord`]; only a
    /// clean end on a word boundary terminates the image.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, LoadError> {
        let mut words = Vec::new();
        let mut buf = [0u8; 2];
        let mut offset = 0usize;

        loop {
            let mut filled = 0;
            while filled < buf.len() {
                match reader.read(&mut buf[filled..]) {
                    Ok(0) => break,
                    Ok(n) => filled += n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            }

            match filled {
                0 => break,
                1 => return Err(LoadError::TruncatedWord { offset }),
                _ => {}
            }

            if words.len() == MEMORY_SIZE {
                return Err(LoadError::ProgramTooLarge { words: MEMORY_SIZE });
            }
            words.push(u16::from_le_bytes(buf));
            offset += buf.len();
        }

        crate::debug_vm!("Decoded program image of {} words", words.len());
        Ok(ProgramImage { words })
    }

    /// Builds an image from already decoded words
    pub fn from_words(words: &[u16]) -> Result<Self, LoadError> {
        if words.len() > MEMORY_SIZE {
            return Err(LoadError::ProgramTooLarge { words: MEMORY_SIZE });
        }
        Ok(ProgramImage {
            words: words.to_vec(),
        })
    }

    pub fn words(&self) -> &[u16] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
