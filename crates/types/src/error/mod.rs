// Path: crates/types/src/error/mod.rs
//! Core error types for the Albatross core primitives.

use crate::app::NetworkId;
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised while parsing an `Address` from bytes or text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The raw input did not have the expected number of bytes or characters.
    #[error("Invalid address length: expected {expected}, got {got}")]
    InvalidLength {
        /// The expected length.
        expected: usize,
        /// The length of the input.
        got: usize,
    },
    /// The input contained characters outside the expected alphabet.
    #[error("Invalid address format: {0}")]
    InvalidFormat(String),
    /// The IBAN check digits embedded in a user-friendly address are wrong.
    #[error("Address checksum mismatch: expected {expected}, got {got}")]
    ChecksumMismatch {
        /// The check digits computed from the payload.
        expected: String,
        /// The check digits found in the input.
        got: String,
    },
}

impl ErrorCode for AddressError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidLength { .. } => "ADDRESS_INVALID_LENGTH",
            Self::InvalidFormat(_) => "ADDRESS_INVALID_FORMAT",
            Self::ChecksumMismatch { .. } => "ADDRESS_CHECKSUM_MISMATCH",
        }
    }
}

/// Errors raised by the binary codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input ended before the value was fully read.
    #[error("Unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd {
        /// The number of bytes the decoder tried to read.
        needed: usize,
        /// The number of bytes left in the input.
        remaining: usize,
    },
    /// A tag byte did not match any known variant.
    #[error("Unknown discriminant {value} for {ty}")]
    UnknownDiscriminant {
        /// The name of the type being decoded.
        ty: &'static str,
        /// The offending tag value.
        value: u64,
    },
    /// A canonical decode finished with unread bytes left over.
    #[error("{0} trailing bytes after canonical decode")]
    TrailingBytes(usize),
    /// A variable-length field is longer than its `u16` length prefix allows.
    #[error("Length {0} does not fit a u16 length prefix")]
    LengthOverflow(usize),
    /// The bytes were structurally readable but semantically invalid.
    #[error("Invalid encoding: {0}")]
    Invalid(String),
}

impl ErrorCode for CodecError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnexpectedEnd { .. } => "CODEC_UNEXPECTED_END",
            Self::UnknownDiscriminant { .. } => "CODEC_UNKNOWN_DISCRIMINANT",
            Self::TrailingBytes(_) => "CODEC_TRAILING_BYTES",
            Self::LengthOverflow(_) => "CODEC_LENGTH_OVERFLOW",
            Self::Invalid(_) => "CODEC_INVALID",
        }
    }
}

/// General errors of the base crate.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An address could not be parsed.
    #[error("Address error: {0}")]
    Address(#[from] AddressError),
    /// A value could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    /// The numeric network identifier is not known.
    #[error("Unknown network id: {0}")]
    UnknownNetworkId(u8),
    /// The numeric account type is not known.
    #[error("Unknown account type: {0}")]
    UnknownAccountType(u8),
    /// A configuration file or value could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ErrorCode for CoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::Address(e) => e.code(),
            Self::Codec(e) => e.code(),
            Self::UnknownNetworkId(_) => "CORE_UNKNOWN_NETWORK_ID",
            Self::UnknownAccountType(_) => "CORE_UNKNOWN_ACCOUNT_TYPE",
            Self::Config(_) => "CORE_CONFIG_ERROR",
        }
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(e: toml::de::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}

/// Errors related to cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The provided key material is malformed or invalid for the specified algorithm.
    #[error("Invalid cryptographic key: {0}")]
    InvalidKey(String),
    /// The provided signature material is malformed or invalid for the specified algorithm.
    #[error("Invalid signature format: {0}")]
    InvalidSignature(String),
    /// A fixed-size value had an unexpected length.
    #[error("Invalid length: expected {expected}, got {got}")]
    InvalidLength {
        /// The expected length in bytes.
        expected: usize,
        /// The actual length in bytes.
        got: usize,
    },
    /// A text encoding (hex, JSON) could not be parsed.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// A KDF or hashing parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// A multi-signature proof was requested over an empty key set.
    #[error("Public key set is empty")]
    EmptyKeySet,
    /// The signer of a multi-signature proof is not part of the key set.
    #[error("Signer key is not part of the public key set")]
    SignerNotInKeySet,
    /// An error occurred during deserialization of a cryptographic object.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// A generic failure in an underlying cryptographic library.
    #[error("Cryptographic operation failed: {0}")]
    OperationFailed(String),
    /// The requested cryptographic operation or parameter is not supported.
    #[error("Unsupported cryptographic operation or parameter: {0}")]
    Unsupported(String),
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidKey(_) => "CRYPTO_INVALID_KEY",
            Self::InvalidSignature(_) => "CRYPTO_INVALID_SIGNATURE",
            Self::InvalidLength { .. } => "CRYPTO_INVALID_LENGTH",
            Self::InvalidFormat(_) => "CRYPTO_INVALID_FORMAT",
            Self::InvalidParameter(_) => "CRYPTO_INVALID_PARAMETER",
            Self::EmptyKeySet => "CRYPTO_EMPTY_KEY_SET",
            Self::SignerNotInKeySet => "CRYPTO_SIGNER_NOT_IN_KEY_SET",
            Self::Deserialization(_) => "CRYPTO_DESERIALIZATION_ERROR",
            Self::OperationFailed(_) => "CRYPTO_OPERATION_FAILED",
            Self::Unsupported(_) => "CRYPTO_UNSUPPORTED",
        }
    }
}

impl From<CodecError> for CryptoError {
    fn from(e: CodecError) -> Self {
        CryptoError::Deserialization(e.to_string())
    }
}

/// A violated construction-time or verification-time rule of a transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A contract creation must target a Vesting or HTLC account.
    #[error("Contract creation requires a vesting or HTLC recipient")]
    InvalidContractCreationRecipientType,
    /// The creation data does not parse as the recipient contract's format.
    #[error("Invalid contract creation data: {0}")]
    InvalidContractCreationData(String),
    /// The recipient of a contract creation is not the derived contract address.
    #[error("Recipient is not the contract creation address")]
    InvalidContractCreationAddress,
    /// A signaling transaction must carry recipient data.
    #[error("Signaling transaction without data")]
    EmptySignalingData,
    /// A signaling transaction must not move value.
    #[error("Signaling transaction with non-zero value")]
    NonZeroSignalingValue,
    /// A regular transaction must move value.
    #[error("Transaction with zero value")]
    ZeroValue,
    /// `value + fee` overflows a `u64`.
    #[error("Value plus fee overflows")]
    ValueOverflow,
    /// Sender and recipient are the same account.
    #[error("Sender and recipient are the same account")]
    SenderEqualsRecipient,
    /// The recipient data exceeds its length prefix.
    #[error("Recipient data too long: {0} bytes")]
    DataTooLong(usize),
    /// The sender data exceeds its length prefix.
    #[error("Sender data too long: {0} bytes")]
    SenderDataTooLong(usize),
    /// The proof exceeds its length prefix.
    #[error("Proof too long: {0} bytes")]
    ProofTooLong(usize),
    /// The flag byte carries bits that are not defined.
    #[error("Invalid transaction flags: {0:#04x}")]
    InvalidFlags(u8),
    /// The signaling flag does not match the kind of staking operation.
    #[error("Signaling flag does not match the staking operation")]
    SignalingMismatch,
    /// The recipient account type does not accept this transaction.
    #[error("Invalid for recipient: {0}")]
    InvalidForRecipient(String),
    /// The sender account type does not allow this transaction.
    #[error("Invalid for sender: {0}")]
    InvalidForSender(String),
}

impl ErrorCode for ValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidContractCreationRecipientType => "TX_INVALID_CREATION_RECIPIENT_TYPE",
            Self::InvalidContractCreationData(_) => "TX_INVALID_CREATION_DATA",
            Self::InvalidContractCreationAddress => "TX_INVALID_CREATION_ADDRESS",
            Self::EmptySignalingData => "TX_EMPTY_SIGNALING_DATA",
            Self::NonZeroSignalingValue => "TX_NON_ZERO_SIGNALING_VALUE",
            Self::ZeroValue => "TX_ZERO_VALUE",
            Self::ValueOverflow => "TX_VALUE_OVERFLOW",
            Self::SenderEqualsRecipient => "TX_SENDER_EQUALS_RECIPIENT",
            Self::DataTooLong(_) => "TX_DATA_TOO_LONG",
            Self::SenderDataTooLong(_) => "TX_SENDER_DATA_TOO_LONG",
            Self::ProofTooLong(_) => "TX_PROOF_TOO_LONG",
            Self::InvalidFlags(_) => "TX_INVALID_FLAGS",
            Self::SignalingMismatch => "TX_SIGNALING_MISMATCH",
            Self::InvalidForRecipient(_) => "TX_INVALID_FOR_RECIPIENT",
            Self::InvalidForSender(_) => "TX_INVALID_FOR_SENDER",
        }
    }
}

/// Errors related to transaction construction, decoding and verification.
#[derive(Error, Debug)]
pub enum TransactionError {
    /// A transaction field invariant is violated.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    /// The transaction bytes could not be decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    /// A cryptographic object could not be parsed or produced.
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
    /// An address field could not be parsed.
    #[error("Address error: {0}")]
    Address(#[from] AddressError),
    /// Contract data or a contract proof does not match its expected layout.
    #[error("Malformed contract data: {0}")]
    MalformedData(String),
    /// The proof is missing or structurally invalid.
    #[error("Invalid proof: {0}")]
    InvalidProof(String),
    /// A signature in the proof does not verify.
    #[error("Invalid signature")]
    InvalidSignature,
    /// The proof was not produced by the expected account.
    #[error("Proof is not signed by the sender")]
    SignerMismatch,
    /// The transaction belongs to a different network.
    #[error("Network mismatch: expected {expected}, got {got}")]
    NetworkMismatch {
        /// The network the caller expects.
        expected: NetworkId,
        /// The network encoded in the transaction.
        got: NetworkId,
    },
    /// The serialized transaction exceeds the maximum size.
    #[error("Transaction too large: {size} bytes exceeds {max}")]
    TooLarge {
        /// The serialized size in bytes.
        size: usize,
        /// The maximum allowed size in bytes.
        max: usize,
    },
    /// The requested operation is not supported for this transaction shape.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl ErrorCode for TransactionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.code(),
            Self::Codec(e) => e.code(),
            Self::Crypto(e) => e.code(),
            Self::Address(e) => e.code(),
            Self::MalformedData(_) => "TX_MALFORMED_DATA",
            Self::InvalidProof(_) => "TX_INVALID_PROOF",
            Self::InvalidSignature => "TX_INVALID_SIGNATURE",
            Self::SignerMismatch => "TX_SIGNER_MISMATCH",
            Self::NetworkMismatch { .. } => "TX_NETWORK_MISMATCH",
            Self::TooLarge { .. } => "TX_TOO_LARGE",
            Self::Unsupported(_) => "TX_UNSUPPORTED",
        }
    }
}

impl From<CoreError> for TransactionError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Address(e) => TransactionError::Address(e),
            CoreError::Codec(e) => TransactionError::Codec(e),
            other => TransactionError::MalformedData(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for TransactionError {
    fn from(e: serde_json::Error) -> Self {
        TransactionError::MalformedData(e.to_string())
    }
}
