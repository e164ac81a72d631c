// Mnemonic code: entropy <-> word list, and seed stretching

use crate::core::sha256_hash;
use crate::mnemonic::MnemonicError;
use bip39::Language;
use rand::RngCore;
use sha2::Sha512;

/// PBKDF2 rounds for seed stretching
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Largest entropy accepted; its checksum uses all 256 bits of SHA256
const MAX_ENTROPY_BYTES: usize = 1024;

const BITS_PER_WORD: usize = 11;

/// Word count for `MAX_ENTROPY_BYTES` of entropy plus checksum
const MAX_WORDS: usize = MAX_ENTROPY_BYTES * 8 * 33 / 32 / BITS_PER_WORD;

fn check_entropy_length(len: usize) -> Result<(), MnemonicError> {
    if len == 0 || len % 4 != 0 || len > MAX_ENTROPY_BYTES {
        return Err(MnemonicError::EntropyLength(len));
    }
    Ok(())
}

/// Split a seed phrase on runs of whitespace, dropping empty pieces
pub fn split_phrase(phrase: &str) -> Vec<&str> {
    phrase.split_whitespace().collect()
}

/// Converts between entropy and seed phrases using a 2048 word dictionary
#[derive(Debug, Clone, Copy)]
pub struct MnemonicCode {
    words: &'static [&'static str; 2048],
}

impl MnemonicCode {
    /// Mnemonic code over the English word list
    pub fn new() -> Self {
        Self {
            words: Language::English.word_list(),
        }
    }

    pub fn word_list(&self) -> &'static [&'static str] {
        self.words
    }

    /// Index of a word in the (sorted) dictionary, exact match
    pub fn word_index(&self, word: &str) -> Option<usize> {
        self.words.binary_search_by(|probe| (*probe).cmp(word)).ok()
    }

    /// Encode entropy as a list of words
    pub fn to_mnemonic(&self, entropy: &[u8]) -> Result<Vec<String>, MnemonicError> {
        check_entropy_length(entropy.len())?;

        let hash = sha256_hash(entropy);
        let entropy_bits = entropy.len() * 8;
        let checksum_bits = entropy_bits / 32;
        let total_bits = entropy_bits + checksum_bits;

        let bit = |i: usize| -> usize {
            let (bytes, i) = if i < entropy_bits {
                (entropy, i)
            } else {
                (&hash[..], i - entropy_bits)
            };
            ((bytes[i / 8] >> (7 - i % 8)) & 1) as usize
        };

        let words = (0..total_bits / BITS_PER_WORD)
            .map(|w| {
                let index = (0..BITS_PER_WORD)
                    .fold(0usize, |acc, b| (acc << 1) | bit(w * BITS_PER_WORD + b));
                self.words[index].to_string()
            })
            .collect();

        Ok(words)
    }

    /// Decode a list of words back to entropy, verifying the checksum
    pub fn to_entropy<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<u8>, MnemonicError> {
        if words.is_empty() || words.len() % 3 != 0 || words.len() > MAX_WORDS {
            return Err(MnemonicError::Length(words.len()));
        }

        let concat_bits = words.len() * BITS_PER_WORD;
        let mut concat = vec![false; concat_bits];
        for (w, word) in words.iter().enumerate() {
            let word = word.as_ref();
            let index = self
                .word_index(word)
                .ok_or_else(|| MnemonicError::Word(word.to_string()))?;
            for b in 0..BITS_PER_WORD {
                concat[w * BITS_PER_WORD + b] = (index >> (BITS_PER_WORD - 1 - b)) & 1 == 1;
            }
        }

        let checksum_bits = concat_bits / 33;
        let entropy_bits = concat_bits - checksum_bits;

        let mut entropy = vec![0u8; entropy_bits / 8];
        for (i, byte) in entropy.iter_mut().enumerate() {
            for b in 0..8 {
                if concat[i * 8 + b] {
                    *byte |= 1 << (7 - b);
                }
            }
        }

        let hash = sha256_hash(&entropy);
        let hash_bit = |i: usize| (hash[i / 8] >> (7 - i % 8)) & 1 == 1;
        if (0..checksum_bits).any(|i| concat[entropy_bits + i] != hash_bit(i)) {
            return Err(MnemonicError::Checksum);
        }

        Ok(entropy)
    }

    /// Check word count, dictionary membership and checksum
    pub fn check<S: AsRef<str>>(&self, words: &[S]) -> Result<(), MnemonicError> {
        self.to_entropy(words).map(|_| ())
    }

    /// Generate a seed phrase from `entropy_bytes` bytes of randomness
    pub fn generate<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        entropy_bytes: usize,
    ) -> Result<Vec<String>, MnemonicError> {
        check_entropy_length(entropy_bytes)?;
        let mut entropy = vec![0u8; entropy_bytes];
        rng.fill_bytes(&mut entropy);
        self.to_mnemonic(&entropy)
    }

    /// Stretch a phrase into a 64 byte seed. The words are not validated.
    pub fn to_seed<S: AsRef<str>>(words: &[S], passphrase: &str) -> [u8; 64] {
        let phrase = words
            .iter()
            .map(|w| w.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        let salt = format!("mnemonic{}", passphrase);

        let mut seed = [0u8; 64];
        pbkdf2::pbkdf2_hmac::<Sha512>(phrase.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut seed);
        seed
    }
}

impl Default for MnemonicCode {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn words(phrase: &str) -> Vec<&str> {
        split_phrase(phrase)
    }

    #[test]
    fn test_zero_entropy_vector() {
        let mc = MnemonicCode::new();
        let phrase = mc.to_mnemonic(&[0u8; 16]).unwrap();
        assert_eq!(phrase.len(), 12);
        assert_eq!(
            phrase.join(" "),
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about"
        );
    }

    #[test]
    fn test_known_vectors() {
        let mc = MnemonicCode::new();
        let cases = [
            (
                [0x7fu8; 16],
                "legal winner thank year wave sausage worth useful legal winner thank yellow",
            ),
            (
                [0x80u8; 16],
                "letter advice cage absurd amount doctor acoustic avoid letter advice cage above",
            ),
            (
                [0xffu8; 16],
                "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong",
            ),
        ];

        for (entropy, expected) in cases {
            assert_eq!(mc.to_mnemonic(&entropy).unwrap().join(" "), expected);
            assert_eq!(mc.to_entropy(&words(expected)).unwrap(), entropy);
        }
    }

    #[test]
    fn test_32_bytes_give_24_words() {
        let mc = MnemonicCode::new();
        let phrase = mc.to_mnemonic(&[0u8; 32]).unwrap();
        assert_eq!(phrase.len(), 24);
        assert_eq!(phrase[23], "art");
    }

    #[test]
    fn test_entropy_length_rejected() {
        let mc = MnemonicCode::new();
        assert_eq!(mc.to_mnemonic(&[]), Err(MnemonicError::EntropyLength(0)));
        assert_eq!(mc.to_mnemonic(&[1u8; 15]), Err(MnemonicError::EntropyLength(15)));
        assert_eq!(
            mc.to_mnemonic(&vec![1u8; 1028]),
            Err(MnemonicError::EntropyLength(1028))
        );
    }

    #[test]
    fn test_word_count_rejected() {
        let mc = MnemonicCode::new();
        let empty: [&str; 0] = [];
        assert_eq!(mc.check(&empty), Err(MnemonicError::Length(0)));
        assert_eq!(
            mc.check(&words("abandon abandon abandon abandon")),
            Err(MnemonicError::Length(4))
        );
    }

    #[test]
    fn test_longest_phrase() {
        let mc = MnemonicCode::new();
        let entropy = vec![0xa5u8; MAX_ENTROPY_BYTES];
        let phrase = mc.to_mnemonic(&entropy).unwrap();
        assert_eq!(phrase.len(), MAX_WORDS);
        assert_eq!(MAX_WORDS, 768);
        assert_eq!(mc.to_entropy(&phrase).unwrap(), entropy);

        // more words than the largest entropy can produce
        let mut longer = phrase.clone();
        longer.extend(phrase[..3].iter().cloned());
        assert_eq!(mc.check(&longer), Err(MnemonicError::Length(771)));
        assert_eq!(mc.check(&vec!["abandon"; 3 * 1000]), Err(MnemonicError::Length(3000)));
    }

    #[test]
    fn test_generate_rejects_length_before_allocating() {
        let mc = MnemonicCode::new();
        assert_eq!(
            mc.generate(&mut OsRng, usize::MAX),
            Err(MnemonicError::EntropyLength(usize::MAX))
        );
        assert_eq!(mc.generate(&mut OsRng, 0), Err(MnemonicError::EntropyLength(0)));
        assert_eq!(mc.generate(&mut OsRng, 1028), Err(MnemonicError::EntropyLength(1028)));
        assert_eq!(mc.generate(&mut OsRng, 1024).unwrap().len(), 768);
    }

    #[test]
    fn test_unknown_word_rejected() {
        let mc = MnemonicCode::new();
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon bitcoinx";
        assert_eq!(
            mc.check(&words(phrase)),
            Err(MnemonicError::Word("bitcoinx".to_string()))
        );
        // exact match only
        let upper = "Abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        assert_eq!(
            mc.check(&words(upper)),
            Err(MnemonicError::Word("Abandon".to_string()))
        );
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let mc = MnemonicCode::new();
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        assert_eq!(mc.check(&words(phrase)), Err(MnemonicError::Checksum));
    }

    #[test]
    fn test_generated_phrase_checks() {
        let mc = MnemonicCode::new();
        let phrase = mc.generate(&mut OsRng, 32).unwrap();
        assert_eq!(phrase.len(), 24);
        assert!(mc.check(&phrase).is_ok());

        let entropy = mc.to_entropy(&phrase).unwrap();
        assert_eq!(mc.to_mnemonic(&entropy).unwrap(), phrase);
    }

    #[test]
    fn test_to_seed_vector() {
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let seed = MnemonicCode::to_seed(&words(phrase), "TREZOR");
        assert_eq!(
            hex::encode(seed),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_to_seed_empty_passphrase() {
        let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let seed = MnemonicCode::to_seed(&words(phrase), "");
        assert_eq!(
            hex::encode(seed),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn test_split_phrase_whitespace() {
        assert_eq!(
            split_phrase("  zoo\tzoo \n wrong  "),
            vec!["zoo", "zoo", "wrong"]
        );
        assert!(split_phrase("   ").is_empty());
    }

    #[test]
    fn test_word_index() {
        let mc = MnemonicCode::new();
        assert_eq!(mc.word_list().len(), 2048);
        assert_eq!(mc.word_index("abandon"), Some(0));
        assert_eq!(mc.word_index("about"), Some(3));
        assert_eq!(mc.word_index("zoo"), Some(2047));
        assert_eq!(mc.word_index("satoshi"), None);
    }
}
