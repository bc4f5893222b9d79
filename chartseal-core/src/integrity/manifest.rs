//! Protected artifact manifest
//!
//! The manifest is the fixed, ordered list of library files whose combined
//! content is sealed, together with the base directory they live under and the
//! config namespace the trusted fingerprint is stored in. All of it is kept as
//! encoded tokens. Order is part of the trusted contract: reordering entries
//! changes the fingerprint.

use crate::integrity::alphabet::{Alphabet, EncodedToken};
use crate::integrity::error::SealError;

/// Component files of the bundled library, relative to the base directory
static BUNDLED_COMPONENTS: [EncodedToken; 30] = [
    EncodedToken::from_static(&[41, 0, 19, 7, 18, 62, 48, 64, 15, 7, 15]),
    EncodedToken::from_static(&[28, 14, 13, 19, 17, 0, 2, 19, 18, 62, 37, 8, 1, 28, 14, 13, 19, 17, 0, 2, 19, 64, 15, 7, 15]),
    EncodedToken::from_static(&[44, 29, 36, 62, 44, 0, 8, 11, 27, 29, 64, 15, 7, 15]),
    EncodedToken::from_static(&[44, 29, 36, 62, 18, 0, 8, 11, 23, 31, 39, 28, 64, 15, 7, 15]),
    EncodedToken::from_static(&[44, 29, 36, 62, 49, 12, 26, 34, 37, 64, 15, 7, 15]),
    EncodedToken::from_static(&[37, 8, 1, 18, 62, 38, 0, 8, 11, 26, 43, 30, 64, 15, 7, 15]),
    EncodedToken::from_static(&[37, 8, 1, 18, 62, 38, 0, 8, 11, 39, 30, 64, 15, 7, 15]),
    EncodedToken::from_static(&[37, 8, 1, 18, 62, 38, 0, 8, 11, 44, 26, 64, 15, 7, 15]),
    EncodedToken::from_static(&[37, 8, 1, 18, 62, 38, 0, 8, 11, 49, 64, 15, 7, 15]),
    EncodedToken::from_static(&[45, 4, 12, 15, 11, 0, 19, 4, 18, 62, 2, 14, 64, 1, 11, 0, 3, 4, 64, 15, 7, 15]),
    EncodedToken::from_static(&[45, 4, 12, 15, 11, 0, 19, 4, 18, 62, 18, 19, 1, 0, 19, 64, 1, 11, 0, 3, 4, 64, 15, 7, 15]),
    EncodedToken::from_static(&[45, 4, 12, 15, 11, 0, 19, 4, 18, 62, 18, 19, 1, 11, 64, 1, 11, 0, 3, 4, 64, 15, 7, 15]),
    EncodedToken::from_static(&[45, 4, 12, 15, 11, 0, 19, 4, 18, 62, 18, 19, 3, 8, 17, 64, 1, 11, 0, 3, 4, 64, 15, 7, 15]),
    EncodedToken::from_static(&[45, 4, 12, 15, 11, 0, 19, 4, 18, 62, 18, 19, 11, 8, 2, 64, 1, 11, 0, 3, 4, 64, 15, 7, 15]),
    EncodedToken::from_static(&[45, 4, 12, 15, 11, 0, 19, 4, 18, 62, 18, 19, 12, 18, 64, 1, 11, 0, 3, 4, 64, 15, 7, 15]),
    EncodedToken::from_static(&[45, 4, 12, 15, 11, 0, 19, 4, 18, 62, 18, 19, 12, 21, 64, 1, 11, 0, 3, 4, 64, 15, 7, 15]),
    EncodedToken::from_static(&[45, 4, 12, 15, 11, 0, 19, 4, 18, 62, 18, 19, 17, 16, 64, 1, 11, 0, 3, 4, 64, 15, 7, 15]),
    EncodedToken::from_static(&[45, 4, 12, 15, 11, 0, 19, 4, 18, 62, 18, 19, 18, 64, 1, 11, 0, 3, 4, 64, 15, 7, 15]),
    EncodedToken::from_static(&[45, 4, 12, 15, 11, 0, 19, 4, 18, 62, 18, 19, 21, 8, 64, 1, 11, 0, 3, 4, 64, 15, 7, 15]),
    EncodedToken::from_static(&[38, 8, 3, 3, 11, 4, 18, 62, 26, 53, 64, 15, 7, 15]),
    EncodedToken::from_static(&[38, 8, 3, 3, 11, 4, 18, 62, 26, 54, 64, 15, 7, 15]),
    EncodedToken::from_static(&[38, 8, 3, 3, 11, 4, 18, 62, 26, 55, 64, 15, 7, 15]),
    EncodedToken::from_static(&[38, 8, 3, 3, 11, 4, 18, 62, 27, 53, 64, 15, 7, 15]),
    EncodedToken::from_static(&[38, 8, 3, 3, 11, 4, 18, 62, 27, 54, 64, 15, 7, 15]),
    EncodedToken::from_static(&[38, 8, 3, 3, 11, 4, 18, 62, 27, 55, 64, 15, 7, 15]),
    EncodedToken::from_static(&[38, 8, 3, 3, 11, 4, 18, 62, 28, 26, 53, 64, 15, 7, 15]),
    EncodedToken::from_static(&[38, 8, 3, 3, 11, 4, 18, 62, 28, 26, 54, 64, 15, 7, 15]),
    EncodedToken::from_static(&[38, 8, 3, 3, 11, 4, 18, 62, 37, 53, 64, 15, 7, 15]),
    EncodedToken::from_static(&[38, 8, 3, 3, 11, 4, 18, 62, 37, 27, 53, 64, 15, 7, 15]),
    EncodedToken::from_static(&[5, 20, 13, 2, 64, 15, 7, 15]),
];

static BUNDLED_BASE_DIRECTORY: EncodedToken = EncodedToken::from_static(&[
    21, 4, 13, 3, 14, 17, 62, 15, 7, 15, 1, 11, 0, 25, 4, 62, 1, 11, 0, 3, 4, 11, 8, 1, 62, 18, 17,
    2, 62,
]);

static BUNDLED_CONFIG_PREFIX: EncodedToken = EncodedToken::from_static(&[3, 0, 19, 0]);

/// Encoded manifest plus the alphabet its tokens are written against
#[derive(Debug, Clone)]
pub struct Manifest {
    alphabet: Alphabet,
    components: Vec<EncodedToken>,
    base_directory: EncodedToken,
    config_key_prefix: EncodedToken,
}

impl Manifest {
    pub fn new(
        alphabet: Alphabet,
        components: Vec<EncodedToken>,
        base_directory: EncodedToken,
        config_key_prefix: EncodedToken,
    ) -> Self {
        Manifest {
            alphabet,
            components,
            base_directory,
            config_key_prefix,
        }
    }

    /// The manifest shipped with the bundled library
    pub fn bundled() -> Self {
        Manifest {
            alphabet: Alphabet::standard(),
            components: BUNDLED_COMPONENTS.to_vec(),
            base_directory: BUNDLED_BASE_DIRECTORY.clone(),
            config_key_prefix: BUNDLED_CONFIG_PREFIX.clone(),
        }
    }

    /// Build a manifest from plain strings, encoding each one
    pub fn from_plain(
        alphabet: Alphabet,
        components: &[&str],
        base_directory: &str,
        config_key_prefix: &str,
    ) -> Result<Self, SealError> {
        let components = components
            .iter()
            .map(|path| EncodedToken::encode(&alphabet, path))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Manifest {
            base_directory: EncodedToken::encode(&alphabet, base_directory)?,
            config_key_prefix: EncodedToken::encode(&alphabet, config_key_prefix)?,
            components,
            alphabet,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The ordered file list
    pub fn component_manifest(&self) -> &[EncodedToken] {
        &self.components
    }

    /// Root directory all component paths are resolved under
    pub fn base_directory_token(&self) -> &EncodedToken {
        &self.base_directory
    }

    /// Namespace prefix for the stored fingerprint key, also the activation source
    pub fn config_key_prefix_token(&self) -> &EncodedToken {
        &self.config_key_prefix
    }

    /// Decode every component path, in manifest order
    pub fn decoded_components(&self) -> Result<Vec<String>, SealError> {
        self.components
            .iter()
            .map(|token| token.decode(&self.alphabet))
            .collect()
    }

    pub fn decode(&self, token: &EncodedToken) -> Result<String, SealError> {
        token.decode(&self.alphabet)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Manifest::bundled()
    }
}
