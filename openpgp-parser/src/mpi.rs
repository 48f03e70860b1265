//! Multi-precision integers (RFC 4880 §3.2): a two-octet big-endian bit
//! count followed by the big-endian magnitude, with no excess leading zero
//! bits beyond the declared bit length.

use super::{Error, Reader};

/// Bit length encoded by the first two octets of an MPI at `p`.
pub fn bits(p: &[u8]) -> Result<u16, Error> {
    if p.len() < 2 {
        return Err(Error::PrematureEOF);
    }
    Ok(u16::from_be_bytes([p[0], p[1]]))
}

/// Total encoded length (length header + magnitude) of the MPI at `p`,
/// i.e. `2 + ceil(bits/8)`.
pub fn len(p: &[u8]) -> Result<usize, Error> {
    Ok(2 + (usize::from(bits(p)?) + 7) / 8)
}

/// Read one MPI from `reader`, returning its magnitude as a big-endian byte
/// slice (the two-octet bit-length prefix is consumed but not returned).
///
/// Rejects an MPI whose first magnitude octet has more leading zero bits
/// than the declared bit length allows — this is spec invariant 3 (§8):
/// the highest set bit of the first magnitude octet must land exactly
/// where the declared bit length says it should, except for the zero MPI.
pub fn read<'a>(reader: &mut Reader<'a>) -> Result<&'a [u8], Error> {
    reader.read(|reader| {
        // Shifting the declared bit count by 7 before dividing folds the
        // ceil() and the "meaningful bits in the first octet" check into
        // one expression that also falls out correctly for the all-zero
        // MPI (declared_bits == 0, no magnitude octets at all).
        let bits = 7 + usize::from(reader.be_u16()?);
        let magnitude = reader.get_bytes(bits >> 3)?;
        if let Some(&first) = magnitude.first() {
            if first.leading_zeros() as usize + (bits & 7) != 7 {
                return Err(Error::BadMPI);
            }
        }
        Ok(magnitude)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_well_formed_mpi() {
        // bit length 9 -> 2 magnitude octets, high bit of first octet set
        let data = [0x00, 0x09, 0x01, 0xFF];
        let mut r = Reader::new(&data);
        let m = read(&mut r).unwrap();
        assert_eq!(m, &[0x01, 0xFF]);
    }

    #[test]
    fn rejects_excess_leading_zero_bits() {
        // bit length 1 claims only the low bit is meaningful, but the
        // octet has its high bit set too
        let data = [0x00, 0x01, 0xFF];
        let mut r = Reader::new(&data);
        assert_eq!(read(&mut r).unwrap_err(), Error::BadMPI);
    }

    #[test]
    fn zero_mpi_is_well_formed() {
        let data = [0x00, 0x00];
        let mut r = Reader::new(&data);
        let m = read(&mut r).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn truncated_mpi_is_premature_eof() {
        // declares a 2048-bit modulus but only 100 octets follow
        let mut data = std::vec![0u8; 102];
        data[0] = 0x08;
        data[1] = 0x00; // 2048 bits
        let mut r = Reader::new(&data);
        assert_eq!(read(&mut r).unwrap_err(), Error::PrematureEOF);
    }

    #[test]
    fn mpi_len_matches_encoded_size() {
        let data = [0x00, 0x09, 0x01, 0xFF];
        assert_eq!(len(&data).unwrap(), 4);
    }
}
