use std::io::{self, Read, Write};
use std::mem;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::errors::{HashlogitError, Result};
use crate::vectorizer::FeatureDictionary;

/// Model data: the weight vector and the dictionary that maps tokens to its slots.
///
/// The binary layout is a flat little-endian dump without a header:
///
/// ```text
/// u64 weights_count
/// f64 weights[weights_count]
/// u64 dictionary_count
/// dictionary_count times:
///     u64 key_length
///     u8  key[key_length]
///     u64 slot
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub(crate) weights: Vec<f64>,
    pub(crate) dictionary: FeatureDictionary,
}

impl Model {
    /// Creates a model from its parts.
    pub fn new(weights: Vec<f64>, dictionary: FeatureDictionary) -> Self {
        Self {
            weights,
            dictionary,
        }
    }

    /// Gets the weights. The slice is empty if the model was saved before training.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn dictionary(&self) -> &FeatureDictionary {
        &self.dictionary
    }

    pub fn into_parts(self) -> (Vec<f64>, FeatureDictionary) {
        (self.weights, self.dictionary)
    }

    /// Exports the model data.
    ///
    /// Dictionary entries are written in token order, so equal models produce equal bytes.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: W) -> Result<usize>
    where
        W: Write,
    {
        write_parts(&self.weights, &self.dictionary, wtr)
    }

    /// Creates a model from a reader.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Returns
    ///
    /// A model data read from `rdr`.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error or ends early, an I/O error is returned. A key that is
    /// not valid UTF-8 and a count that does not fit in `usize` are reported as well.
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let weights_count = rdr.read_u64::<LittleEndian>()?;
        let mut weights = vec![];
        for _ in 0..weights_count {
            weights.push(rdr.read_f64::<LittleEndian>()?);
        }
        let dictionary_count = rdr.read_u64::<LittleEndian>()?;
        let mut dictionary = FeatureDictionary::new();
        for _ in 0..dictionary_count {
            let key_length = rdr.read_u64::<LittleEndian>()?;
            let key = read_bytes(&mut rdr, key_length)?;
            let slot = usize::try_from(rdr.read_u64::<LittleEndian>()?)?;
            dictionary.insert(String::from_utf8(key)?, slot);
        }
        Ok(Self {
            weights,
            dictionary,
        })
    }

    /// Checks that the model can be used with vectors of `num_features` entries.
    pub(crate) fn check_num_features(&self, num_features: usize) -> Result<()> {
        if !self.weights.is_empty() && self.weights.len() != num_features {
            return Err(HashlogitError::invalid_model(format!(
                "the model has {} weights, but the classifier uses {} features",
                self.weights.len(),
                num_features
            )));
        }
        if let Some((token, slot)) = self.dictionary.iter().find(|&(_, slot)| slot >= num_features)
        {
            return Err(HashlogitError::invalid_model(format!(
                "slot {slot} of token {token:?} is out of range for {num_features} features"
            )));
        }
        Ok(())
    }
}

/// Writes weights and a dictionary in the model layout without assembling a [`Model`].
pub(crate) fn write_parts<W>(
    weights: &[f64],
    dictionary: &FeatureDictionary,
    mut wtr: W,
) -> Result<usize>
where
    W: Write,
{
    wtr.write_u64::<LittleEndian>(weights.len().try_into()?)?;
    for &w in weights {
        wtr.write_f64::<LittleEndian>(w)?;
    }
    let mut entries: Vec<_> = dictionary.iter().collect();
    entries.sort_unstable();
    wtr.write_u64::<LittleEndian>(entries.len().try_into()?)?;
    let mut total_size = mem::size_of::<u64>() * 2 + mem::size_of::<f64>() * weights.len();
    for (token, slot) in entries {
        let key = token.as_bytes();
        wtr.write_u64::<LittleEndian>(key.len().try_into()?)?;
        wtr.write_all(key)?;
        wtr.write_u64::<LittleEndian>(slot.try_into()?)?;
        total_size += mem::size_of::<u64>() * 2 + key.len();
    }
    Ok(total_size)
}

// The length comes from the stream, so the buffer only grows with the bytes actually read.
fn read_bytes<R>(rdr: &mut R, len: u64) -> Result<Vec<u8>>
where
    R: Read,
{
    let mut buf = vec![];
    rdr.take(len).read_to_end(&mut buf)?;
    if buf.len() as u64 != len {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    fn sample_model() -> Model {
        let mut dictionary = FeatureDictionary::new();
        dictionary.insert("cat".to_string(), 1);
        dictionary.insert("dog".to_string(), 2);
        dictionary.insert("кот".to_string(), 1);
        Model::new(vec![0.0, 2.5, -1.0 / 3.0, f64::MIN_POSITIVE], dictionary)
    }

    #[test]
    fn test_write_layout() {
        let mut dictionary = FeatureDictionary::new();
        dictionary.insert("ab".to_string(), 1);
        let model = Model::new(vec![0.5, -2.0], dictionary);

        let mut buf = vec![];
        let size = model.write(&mut buf).unwrap();

        let mut expected = vec![];
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(&0.5f64.to_le_bytes());
        expected.extend_from_slice(&(-2.0f64).to_le_bytes());
        expected.extend_from_slice(&1u64.to_le_bytes());
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(b"ab");
        expected.extend_from_slice(&1u64.to_le_bytes());
        assert_eq!(expected, buf);
        assert_eq!(expected.len(), size);
    }

    #[test]
    fn test_write_read() {
        let model = sample_model();

        let mut buf = vec![];
        model.write(&mut buf).unwrap();
        let restored = Model::read(Cursor::new(&buf)).unwrap();

        let bits = |ws: &[f64]| ws.iter().map(|w| w.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(model.weights()), bits(restored.weights()));
        assert_eq!(model.dictionary(), restored.dictionary());
    }

    #[test]
    fn test_write_deterministic() {
        let model = sample_model();
        let mut buf1 = vec![];
        model.write(&mut buf1).unwrap();
        let mut buf2 = vec![];
        model.clone().write(&mut buf2).unwrap();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn test_read_empty_model() {
        let mut buf = vec![];
        Model::default().write(&mut buf).unwrap();
        assert_eq!(16, buf.len());

        let model = Model::read(buf.as_slice()).unwrap();
        assert!(model.weights().is_empty());
        assert!(model.dictionary().is_empty());
    }

    #[test]
    fn test_read_truncated() {
        let mut buf = vec![];
        sample_model().write(&mut buf).unwrap();

        for len in [0, 7, 8, 20, buf.len() - 1] {
            let e = Model::read(&buf[..len]).unwrap_err();
            assert!(matches!(e, HashlogitError::IOError(_)), "len={len}: {e}");
        }
    }

    #[test]
    fn test_read_huge_key_length() {
        let mut buf = vec![];
        buf.extend_from_slice(&0u64.to_le_bytes());
        buf.extend_from_slice(&1u64.to_le_bytes());
        buf.extend_from_slice(&u64::MAX.to_le_bytes());
        buf.extend_from_slice(b"abc");

        let e = Model::read(buf.as_slice()).unwrap_err();
        assert!(matches!(e, HashlogitError::IOError(_)));
    }

    #[test]
    fn test_read_invalid_utf8() {
        let mut buf = vec![];
        buf.extend_from_slice(&0u64.to_le_bytes());
        buf.extend_from_slice(&1u64.to_le_bytes());
        buf.extend_from_slice(&1u64.to_le_bytes());
        buf.push(0xff);
        buf.extend_from_slice(&0u64.to_le_bytes());

        let e = Model::read(buf.as_slice()).unwrap_err();
        assert!(matches!(e, HashlogitError::UTF8Error(_)));
    }

    #[test]
    fn test_check_num_features() {
        let model = sample_model();
        assert!(model.check_num_features(4).is_ok());
        assert!(matches!(
            model.check_num_features(5),
            Err(HashlogitError::InvalidModel(_))
        ));

        let (_, dictionary) = model.into_parts();
        let model = Model::new(vec![], dictionary);
        assert!(model.check_num_features(3).is_ok());
        assert!(matches!(
            model.check_num_features(2),
            Err(HashlogitError::InvalidModel(_))
        ));
    }
}
