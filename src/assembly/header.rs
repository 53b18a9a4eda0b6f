//! Managed-code header inspection for PE images
//!
//! A managed assembly is a PE image whose optional header carries a non-empty
//! CLI runtime header in data directory 14. Only the headers are read; the
//! image is never mapped or loaded.

use std::io::{Read, Seek, SeekFrom};

use thiserror::Error;

/// `MZ`
const DOS_MAGIC: [u8; 2] = *b"MZ";

/// Offset of `e_lfanew` inside the DOS header
const LFANEW_OFFSET: u64 = 0x3C;

/// `PE\0\0`
const PE_SIGNATURE: [u8; 4] = *b"PE\0\0";

/// Size of the COFF file header that follows the signature
const COFF_HEADER_LEN: usize = 20;

const PE32_MAGIC: u16 = 0x10B;
const PE32_PLUS_MAGIC: u16 = 0x20B;

/// Index of the CLI runtime header in the data directory table
const CLI_HEADER_DIRECTORY: usize = 14;

/// Optional header format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeFormat {
    Pe32,
    Pe32Plus,
}

/// What header inspection learned about an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeHeader {
    pub format: PeFormat,
    pub machine: u16,
    /// RVA and size of the CLI header, when present
    pub cli_header: Option<(u32, u32)>,
}

impl PeHeader {
    /// Whether the image carries managed code
    pub fn is_managed(&self) -> bool {
        self.cli_header.is_some()
    }
}

/// Why header inspection failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("image headers are truncated")]
    Truncated,

    #[error("not a PE image")]
    NotPe,

    #[error("unknown optional header magic 0x{0:x}")]
    UnknownOptionalHeader(u16),
}

fn read_exact_at<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
    buf: &mut [u8],
) -> std::result::Result<(), HeaderError> {
    reader
        .seek(SeekFrom::Start(offset))
        .map_err(|_| HeaderError::Truncated)?;
    reader.read_exact(buf).map_err(|_| HeaderError::Truncated)
}

fn u16_at(buf: &[u8], offset: usize) -> Option<u16> {
    buf.get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
}

fn u32_at(buf: &[u8], offset: usize) -> Option<u32> {
    buf.get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Read the PE headers of an image
pub fn read_pe_header<R: Read + Seek>(reader: &mut R) -> std::result::Result<PeHeader, HeaderError> {
    let mut dos_magic = [0u8; 2];
    read_exact_at(reader, 0, &mut dos_magic)?;
    if dos_magic != DOS_MAGIC {
        return Err(HeaderError::NotPe);
    }

    let mut lfanew = [0u8; 4];
    read_exact_at(reader, LFANEW_OFFSET, &mut lfanew)?;
    let pe_offset = u64::from(u32::from_le_bytes(lfanew));

    let mut signature_and_coff = [0u8; 4 + COFF_HEADER_LEN];
    read_exact_at(reader, pe_offset, &mut signature_and_coff)?;
    if signature_and_coff[..4] != PE_SIGNATURE {
        return Err(HeaderError::NotPe);
    }
    let coff = &signature_and_coff[4..];
    let machine = u16_at(coff, 0).ok_or(HeaderError::Truncated)?;
    let optional_len = usize::from(u16_at(coff, 16).ok_or(HeaderError::Truncated)?);

    let mut optional = vec![0u8; optional_len];
    read_exact_at(
        reader,
        pe_offset + 4 + COFF_HEADER_LEN as u64,
        &mut optional,
    )?;

    let magic = u16_at(&optional, 0).ok_or(HeaderError::Truncated)?;
    let (format, rva_count_offset, directories_offset) = match magic {
        PE32_MAGIC => (PeFormat::Pe32, 92, 96),
        PE32_PLUS_MAGIC => (PeFormat::Pe32Plus, 108, 112),
        other => return Err(HeaderError::UnknownOptionalHeader(other)),
    };

    let rva_count = u32_at(&optional, rva_count_offset).ok_or(HeaderError::Truncated)?;
    let cli_header = if rva_count as usize > CLI_HEADER_DIRECTORY {
        let entry = directories_offset + CLI_HEADER_DIRECTORY * 8;
        match (u32_at(&optional, entry), u32_at(&optional, entry + 4)) {
            (Some(rva), Some(size)) if rva != 0 && size != 0 => Some((rva, size)),
            (Some(_), Some(_)) => None,
            _ => return Err(HeaderError::Truncated),
        }
    } else {
        None
    };

    Ok(PeHeader {
        format,
        machine,
        cli_header,
    })
}

/// Whether the reader holds a managed PE image. Malformed input is simply "no".
pub fn is_managed_image<R: Read + Seek>(reader: &mut R) -> bool {
    read_pe_header(reader).is_ok_and(|header| header.is_managed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{managed_pe_image, native_pe_image, pe_image};
    use std::io::Cursor;

    #[test]
    fn test_managed_pe32_image() {
        let header = read_pe_header(&mut Cursor::new(managed_pe_image())).unwrap();
        assert_eq!(header.format, PeFormat::Pe32);
        assert_eq!(header.machine, 0x14c);
        assert!(header.is_managed());
    }

    #[test]
    fn test_managed_pe32_plus_image() {
        let image = pe_image(true, Some((0x2008, 0x48)));
        let header = read_pe_header(&mut Cursor::new(image)).unwrap();
        assert_eq!(header.format, PeFormat::Pe32Plus);
        assert_eq!(header.cli_header, Some((0x2008, 0x48)));
    }

    #[test]
    fn test_native_image_is_not_managed() {
        let header = read_pe_header(&mut Cursor::new(native_pe_image())).unwrap();
        assert!(!header.is_managed());
        assert!(!is_managed_image(&mut Cursor::new(native_pe_image())));
    }

    #[test]
    fn test_cli_directory_with_zero_size_is_not_managed() {
        let image = pe_image(false, Some((0x2008, 0)));
        assert!(!is_managed_image(&mut Cursor::new(image)));
    }

    #[test]
    fn test_non_pe_input() {
        assert_eq!(
            read_pe_header(&mut Cursor::new(b"#!/bin/sh\necho hi\n".to_vec())),
            Err(HeaderError::NotPe)
        );
        assert!(!is_managed_image(&mut Cursor::new(Vec::new())));
    }

    #[test]
    fn test_truncated_image() {
        let mut image = managed_pe_image();
        image.truncate(0x50);
        assert_eq!(
            read_pe_header(&mut Cursor::new(image)),
            Err(HeaderError::Truncated)
        );
    }

    #[test]
    fn test_header_error_messages() {
        let err: Box<dyn std::error::Error> = Box::new(HeaderError::UnknownOptionalHeader(0x107));
        assert_eq!(err.to_string(), "unknown optional header magic 0x107");
        assert_eq!(HeaderError::Truncated.to_string(), "image headers are truncated");
        assert_eq!(HeaderError::NotPe.to_string(), "not a PE image");
    }

    #[test]
    fn test_bad_pe_signature() {
        let mut image = managed_pe_image();
        image[0x40] = b'X';
        assert_eq!(
            read_pe_header(&mut Cursor::new(image)),
            Err(HeaderError::NotPe)
        );
    }
}
