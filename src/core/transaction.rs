// This file implements the record model - what actually lands on the weave.
// A record is built unsigned (TransactionBuilder), and signing hands back a
// separate, immutable Transaction. There is no way to get a Transaction whose
// id and signature disagree.

use crate::core::Tag;
use crate::core::TagJson;
use crate::error::{Result, WeaveError};
use crate::utils::{base64url_encode, decode_field, sha256_array};
use crate::wallet::{address_from_modulus, verify_with_modulus, Signer};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Length of a record id (SHA-256 of the signature)
pub const ID_LEN: usize = 32;

// The fields shared by the unsigned builder and the signed record
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fields {
    last_tx: String,  // Anchor from the ledger, base64url; empty for an account's first record
    owner: BigUint,   // RSA modulus of the signer
    target: String,   // Recipient address, base64url; empty when nothing is transferred
    quantity: String, // Decimal amount in the ledger's smallest unit, "0" for none
    data: Vec<u8>,    // Raw payload
    reward: String,   // Decimal fee offered to the miner
    tags: Vec<Tag>,
}

impl Fields {
    fn validate(&self) -> Result<()> {
        if !is_decimal(&self.quantity) {
            return Err(WeaveError::InvalidInput(format!(
                "quantity must be a decimal integer, got `{}`",
                self.quantity
            )));
        }
        if !is_decimal(&self.reward) {
            return Err(WeaveError::InvalidInput(format!(
                "reward must be a decimal integer, got `{}`",
                self.reward
            )));
        }
        Ok(())
    }

    // owner || target || data || quantity || reward || last_tx || (name || value)*
    // All binary fields contribute their decoded bytes, quantity and reward
    // their ASCII digits.
    fn format_msg_bytes(&self) -> Result<Vec<u8>> {
        self.validate()?;
        let target = decode_field("target", &self.target)?;
        let last_tx = decode_field("last_tx", &self.last_tx)?;

        let mut msg = Vec::new();
        msg.extend(self.owner.to_bytes_be());
        msg.extend(target);
        msg.extend(self.data.iter());
        msg.extend(self.quantity.as_bytes());
        msg.extend(self.reward.as_bytes());
        msg.extend(last_tx);
        for tag in &self.tags {
            msg.extend(tag.get_name());
            msg.extend(tag.get_value());
        }
        Ok(msg)
    }
}

fn is_decimal(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// An unsigned record. Mutable until it is signed; signing never changes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBuilder {
    fields: Fields,
}

impl TransactionBuilder {
    pub fn new(
        last_tx: impl Into<String>,
        owner: BigUint,
        quantity: impl Into<String>,
        target: impl Into<String>,
        data: Vec<u8>,
        reward: impl Into<String>,
    ) -> TransactionBuilder {
        TransactionBuilder {
            fields: Fields {
                last_tx: last_tx.into(),
                owner,
                target: target.into(),
                quantity: quantity.into(),
                data,
                reward: reward.into(),
                tags: Vec::new(),
            },
        }
    }

    pub fn get_last_tx(&self) -> &str {
        &self.fields.last_tx
    }

    pub fn get_owner(&self) -> &BigUint {
        &self.fields.owner
    }

    pub fn get_target(&self) -> &str {
        &self.fields.target
    }

    pub fn get_quantity(&self) -> &str {
        &self.fields.quantity
    }

    pub fn get_data(&self) -> &[u8] {
        self.fields.data.as_slice()
    }

    pub fn get_reward(&self) -> &str {
        &self.fields.reward
    }

    pub fn get_tags(&self) -> &[Tag] {
        self.fields.tags.as_slice()
    }

    pub fn add_tag(&mut self, tag: Tag) {
        self.fields.tags.push(tag);
    }

    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        self.fields.tags = tags;
    }

    pub fn set_data(&mut self, data: Vec<u8>) {
        self.fields.data = data;
    }

    pub fn set_reward(&mut self, reward: impl Into<String>) {
        self.fields.reward = reward.into();
    }

    /// The exact bytes whose SHA-256 gets signed
    pub fn format_msg_bytes(&self) -> Result<Vec<u8>> {
        self.fields.format_msg_bytes()
    }

    /// Sign a snapshot of this builder.
    ///
    /// The canonical message goes to the signer as-is; the PSS message hash
    /// is its SHA-256. The signature is checked with `signer.verify` before
    /// it is accepted. The record id is SHA-256
    /// of the signature.
    pub fn sign<S: Signer + ?Sized>(&self, signer: &S) -> Result<Transaction> {
        if signer.owner() != &self.fields.owner {
            return Err(WeaveError::Crypto(format!(
                "record owner does not match signing wallet {}",
                signer.address()
            )));
        }

        let payload = self.fields.format_msg_bytes()?;

        let signature = signer.sign(&payload)?;
        if signature.is_empty() {
            return Err(WeaveError::Crypto("signer returned an empty signature".to_string()));
        }
        signer.verify(&payload, &signature).map_err(|e| {
            WeaveError::Crypto(format!("freshly produced signature failed self-check: {e}"))
        })?;

        let id = sha256_array(&signature);
        Ok(Transaction {
            fields: self.fields.clone(),
            signature,
            id,
        })
    }
}

/// A signed record. Immutable; `id` is always SHA-256 of `signature`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    fields: Fields,
    signature: Vec<u8>,
    id: [u8; ID_LEN],
}

/// JSON shape a ledger node accepts and serves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionJson {
    pub id: String,
    pub last_tx: String,
    pub owner: String,
    pub target: String,
    pub quantity: String,
    pub data: String,
    pub reward: String,
    pub signature: String,
    #[serde(default)]
    pub tags: Vec<TagJson>,
}

impl Transaction {
    pub fn get_id(&self) -> &[u8; ID_LEN] {
        &self.id
    }

    /// base64url of the id; this is the record's address on the weave
    pub fn id_string(&self) -> String {
        base64url_encode(&self.id)
    }

    pub fn get_last_tx(&self) -> &str {
        &self.fields.last_tx
    }

    pub fn get_owner(&self) -> &BigUint {
        &self.fields.owner
    }

    /// Address of the account that signed this record
    pub fn owner_address(&self) -> String {
        address_from_modulus(&self.fields.owner)
    }

    pub fn get_target(&self) -> &str {
        &self.fields.target
    }

    pub fn get_quantity(&self) -> &str {
        &self.fields.quantity
    }

    pub fn get_data(&self) -> &[u8] {
        self.fields.data.as_slice()
    }

    pub fn get_reward(&self) -> &str {
        &self.fields.reward
    }

    pub fn get_tags(&self) -> &[Tag] {
        self.fields.tags.as_slice()
    }

    /// First tag with the given name
    pub fn find_tag(&self, name: &str) -> Option<&Tag> {
        self.fields.tags.iter().find(|tag| tag.name_is(name))
    }

    pub fn get_signature(&self) -> &[u8] {
        self.signature.as_slice()
    }

    /// An unsigned copy of this record's fields
    pub fn to_builder(&self) -> TransactionBuilder {
        TransactionBuilder {
            fields: self.fields.clone(),
        }
    }

    /// Re-derive the canonical message and check the signature against the
    /// owner modulus. Fails if any signed field was altered.
    pub fn verify(&self) -> Result<()> {
        let payload = self.fields.format_msg_bytes()?;
        if verify_with_modulus(&self.fields.owner, &payload, &self.signature) {
            Ok(())
        } else {
            Err(WeaveError::Crypto(format!(
                "signature of record {} does not verify",
                self.id_string()
            )))
        }
    }

    pub fn to_json(&self) -> TransactionJson {
        TransactionJson {
            id: base64url_encode(&self.id),
            last_tx: self.fields.last_tx.clone(),
            owner: base64url_encode(&self.fields.owner.to_bytes_be()),
            target: self.fields.target.clone(),
            quantity: self.fields.quantity.clone(),
            data: base64url_encode(&self.fields.data),
            reward: self.fields.reward.clone(),
            signature: base64url_encode(&self.signature),
            tags: self.fields.tags.iter().map(Tag::to_json).collect(),
        }
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.to_json())?)
    }

    pub fn from_json(json: &TransactionJson) -> Result<Transaction> {
        let id_bytes = decode_field("id", &json.id)?;
        let signature = decode_field("signature", &json.signature)?;
        let owner = decode_field("owner", &json.owner)?;
        let data = decode_field("data", &json.data)?;
        // Only checked here; the strings themselves are kept as-is
        decode_field("target", &json.target)?;
        decode_field("last_tx", &json.last_tx)?;

        if signature.is_empty() {
            return Err(WeaveError::Encoding("record has no signature".to_string()));
        }
        if owner.is_empty() {
            return Err(WeaveError::Encoding("record has no owner".to_string()));
        }
        let id: [u8; ID_LEN] = id_bytes.as_slice().try_into().map_err(|_| {
            WeaveError::Encoding(format!(
                "record id must be {ID_LEN} bytes, got {}",
                id_bytes.len()
            ))
        })?;
        if sha256_array(&signature) != id {
            return Err(WeaveError::Encoding(format!(
                "record id {} is not the hash of its signature",
                json.id
            )));
        }

        let tags = json
            .tags
            .iter()
            .map(Tag::from_json)
            .collect::<Result<Vec<Tag>>>()?;

        let fields = Fields {
            last_tx: json.last_tx.clone(),
            owner: BigUint::from_bytes_be(&owner),
            target: json.target.clone(),
            quantity: json.quantity.clone(),
            data,
            reward: json.reward.clone(),
            tags,
        };
        fields.validate()?;

        Ok(Transaction {
            fields,
            signature,
            id,
        })
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Transaction> {
        let json: TransactionJson = serde_json::from_slice(bytes)
            .map_err(|e| WeaveError::Encoding(format!("record is not valid JSON: {e}")))?;
        Self::from_json(&json)
    }
}
