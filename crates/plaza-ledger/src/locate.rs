//! Pulls the posting instruction out of a fetched transaction.
//!
//! RPC nodes return transactions in several envelopes depending on the
//! requested encoding and the provider: binary blobs that decode to a
//! [`VersionedTransaction`], raw JSON messages that index into a string
//! key table, and parsed JSON messages where unknown programs show up as
//! partially decoded instructions. All of them funnel into the same
//! result: the author address and the raw payload bytes.

use base64::Engine;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::VersionedTransaction;
use solana_transaction_status::option_serializer::OptionSerializer;
use solana_transaction_status::{
    EncodedTransaction, EncodedTransactionWithStatusMeta, UiInstruction, UiMessage,
    UiParsedInstruction, UiParsedMessage, UiRawMessage, UiTransactionStatusMeta,
};

/// A posting instruction found in a transaction, reduced to what post
/// reconstruction needs.
pub(crate) struct LocatedPost {
    /// Author address: the instruction's first account, or the fee payer
    /// when the instruction carries no accounts.
    pub author: String,
    /// Raw instruction payload bytes.
    pub payload: Vec<u8>,
}

/// Finds the first instruction addressed to `program_id` and returns its
/// payload. `None` when the transaction holds no such instruction or its
/// payload encoding is unreadable.
pub(crate) fn locate_posting_instruction(
    tx: &EncodedTransactionWithStatusMeta,
    program_id: &Pubkey,
) -> Option<LocatedPost> {
    if let Some(versioned) = tx.transaction.decode() {
        return locate_in_versioned(&versioned, tx.meta.as_ref(), program_id);
    }
    match &tx.transaction {
        EncodedTransaction::Json(ui) => match &ui.message {
            UiMessage::Raw(raw) => locate_in_raw(raw, tx.meta.as_ref(), program_id),
            UiMessage::Parsed(parsed) => locate_in_parsed(parsed, program_id),
        },
        _ => None,
    }
}

/// Instruction payloads in JSON envelopes are base58 strings, though some
/// providers hand back base64.
pub(crate) fn decode_payload_str(data: &str) -> Option<Vec<u8>> {
    if let Ok(bytes) = bs58::decode(data).into_vec() {
        return Some(bytes);
    }
    base64::engine::general_purpose::STANDARD.decode(data).ok()
}

// Address-table entries loaded at runtime extend the static key table,
// writable before readonly.
fn extend_with_loaded(keys: &mut Vec<String>, meta: Option<&UiTransactionStatusMeta>) {
    if let Some(meta) = meta {
        if let OptionSerializer::Some(loaded) = &meta.loaded_addresses {
            keys.extend(loaded.writable.iter().cloned());
            keys.extend(loaded.readonly.iter().cloned());
        }
    }
}

fn author_for(keys: &[String], account_indexes: &[u8]) -> Option<String> {
    account_indexes
        .first()
        .and_then(|index| keys.get(*index as usize))
        .or_else(|| keys.first())
        .cloned()
}

fn locate_in_versioned(
    tx: &VersionedTransaction,
    meta: Option<&UiTransactionStatusMeta>,
    program_id: &Pubkey,
) -> Option<LocatedPost> {
    let mut keys: Vec<String> = tx
        .message
        .static_account_keys()
        .iter()
        .map(|key| key.to_string())
        .collect();
    extend_with_loaded(&mut keys, meta);

    let program = program_id.to_string();
    for instruction in tx.message.instructions() {
        if keys.get(instruction.program_id_index as usize) != Some(&program) {
            continue;
        }
        let author = author_for(&keys, &instruction.accounts)?;
        return Some(LocatedPost {
            author,
            payload: instruction.data.clone(),
        });
    }
    None
}

fn locate_in_raw(
    message: &UiRawMessage,
    meta: Option<&UiTransactionStatusMeta>,
    program_id: &Pubkey,
) -> Option<LocatedPost> {
    let mut keys = message.account_keys.clone();
    extend_with_loaded(&mut keys, meta);

    let program = program_id.to_string();
    for instruction in &message.instructions {
        if keys.get(instruction.program_id_index as usize) != Some(&program) {
            continue;
        }
        let payload = decode_payload_str(&instruction.data)?;
        let author = author_for(&keys, &instruction.accounts)?;
        return Some(LocatedPost { author, payload });
    }
    None
}

fn locate_in_parsed(message: &UiParsedMessage, program_id: &Pubkey) -> Option<LocatedPost> {
    let keys: Vec<String> = message
        .account_keys
        .iter()
        .map(|account| account.pubkey.clone())
        .collect();

    let program = program_id.to_string();
    for instruction in &message.instructions {
        match instruction {
            UiInstruction::Compiled(compiled) => {
                if keys.get(compiled.program_id_index as usize) != Some(&program) {
                    continue;
                }
                let payload = decode_payload_str(&compiled.data)?;
                let author = author_for(&keys, &compiled.accounts)?;
                return Some(LocatedPost { author, payload });
            }
            UiInstruction::Parsed(UiParsedInstruction::PartiallyDecoded(decoded)) => {
                if decoded.program_id != program {
                    continue;
                }
                let payload = decode_payload_str(&decoded.data)?;
                let author = decoded
                    .accounts
                    .first()
                    .cloned()
                    .or_else(|| keys.first().cloned())?;
                return Some(LocatedPost { author, payload });
            }
            // Fully parsed instructions belong to well-known native
            // programs, never the posting program.
            UiInstruction::Parsed(UiParsedInstruction::Parsed(_)) => continue,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use plaza_codec::PostInstruction;
    use solana_sdk::hash::Hash;
    use solana_sdk::instruction::CompiledInstruction;
    use solana_sdk::message::v0::{Message as V0Message, MessageAddressTableLookup};
    use solana_sdk::message::{Message, MessageHeader, VersionedMessage};
    use solana_sdk::signature::Signature;
    use solana_transaction_status::parse_accounts::ParsedAccount;
    use solana_transaction_status::{
        UiCompiledInstruction, UiLoadedAddresses, UiPartiallyDecodedInstruction, UiTransaction,
    };

    fn sample_payload() -> Vec<u8> {
        PostInstruction::new("ipfs://QmLocate", [3u8; 32], 21)
            .encode()
            .unwrap()
    }

    fn header() -> MessageHeader {
        MessageHeader {
            num_required_signatures: 1,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 1,
        }
    }

    fn raw_message(keys: Vec<String>, instructions: Vec<UiCompiledInstruction>) -> UiRawMessage {
        UiRawMessage {
            header: header(),
            account_keys: keys,
            recent_blockhash: Hash::default().to_string(),
            instructions,
            address_table_lookups: None,
        }
    }

    fn json_envelope(message: UiMessage) -> EncodedTransactionWithStatusMeta {
        EncodedTransactionWithStatusMeta {
            transaction: EncodedTransaction::Json(UiTransaction {
                signatures: vec![Signature::default().to_string()],
                message,
            }),
            meta: None,
            version: None,
        }
    }

    fn meta_with_loaded(writable: Vec<String>) -> UiTransactionStatusMeta {
        UiTransactionStatusMeta {
            err: None,
            status: Ok(()),
            fee: 5000,
            pre_balances: vec![],
            post_balances: vec![],
            inner_instructions: OptionSerializer::Skip,
            log_messages: OptionSerializer::Skip,
            pre_token_balances: OptionSerializer::Skip,
            post_token_balances: OptionSerializer::Skip,
            rewards: OptionSerializer::Skip,
            loaded_addresses: OptionSerializer::Some(UiLoadedAddresses {
                writable,
                readonly: vec![],
            }),
            return_data: OptionSerializer::Skip,
            compute_units_consumed: OptionSerializer::Skip,
        }
    }

    #[test]
    fn finds_instruction_in_raw_json_message() {
        let author = Pubkey::new_unique();
        let program = Pubkey::new_unique();
        let payload = sample_payload();
        let message = raw_message(
            vec![author.to_string(), program.to_string()],
            vec![UiCompiledInstruction {
                program_id_index: 1,
                accounts: vec![0],
                data: bs58::encode(&payload).into_string(),
                stack_height: None,
            }],
        );

        let located = locate_posting_instruction(&json_envelope(UiMessage::Raw(message)), &program)
            .expect("instruction should be found");
        assert_eq!(located.author, author.to_string());
        assert_eq!(located.payload, payload);
    }

    #[test]
    fn raw_json_message_accepts_base64_payload() {
        let author = Pubkey::new_unique();
        let program = Pubkey::new_unique();
        let payload = sample_payload();
        let message = raw_message(
            vec![author.to_string(), program.to_string()],
            vec![UiCompiledInstruction {
                program_id_index: 1,
                accounts: vec![0],
                data: base64::engine::general_purpose::STANDARD.encode(&payload),
                stack_height: None,
            }],
        );

        let located = locate_posting_instruction(&json_envelope(UiMessage::Raw(message)), &program)
            .expect("instruction should be found");
        assert_eq!(located.payload, payload);
    }

    #[test]
    fn other_programs_are_ignored() {
        let author = Pubkey::new_unique();
        let program = Pubkey::new_unique();
        let message = raw_message(
            vec![author.to_string(), Pubkey::new_unique().to_string()],
            vec![UiCompiledInstruction {
                program_id_index: 1,
                accounts: vec![0],
                data: bs58::encode(sample_payload()).into_string(),
                stack_height: None,
            }],
        );

        assert!(
            locate_posting_instruction(&json_envelope(UiMessage::Raw(message)), &program).is_none()
        );
    }

    #[test]
    fn finds_partially_decoded_instruction_in_parsed_message() {
        let author = Pubkey::new_unique();
        let program = Pubkey::new_unique();
        let payload = sample_payload();
        let message = UiParsedMessage {
            account_keys: vec![ParsedAccount {
                pubkey: author.to_string(),
                writable: true,
                signer: true,
                source: None,
            }],
            recent_blockhash: Hash::default().to_string(),
            instructions: vec![UiInstruction::Parsed(UiParsedInstruction::PartiallyDecoded(
                UiPartiallyDecodedInstruction {
                    program_id: program.to_string(),
                    accounts: vec![author.to_string()],
                    data: bs58::encode(&payload).into_string(),
                    stack_height: None,
                },
            ))],
            address_table_lookups: None,
        };

        let located =
            locate_posting_instruction(&json_envelope(UiMessage::Parsed(message)), &program)
                .expect("instruction should be found");
        assert_eq!(located.author, author.to_string());
        assert_eq!(located.payload, payload);
    }

    #[test]
    fn accountless_instruction_falls_back_to_fee_payer() {
        let payer = Pubkey::new_unique();
        let program = Pubkey::new_unique();
        let message = raw_message(
            vec![payer.to_string(), program.to_string()],
            vec![UiCompiledInstruction {
                program_id_index: 1,
                accounts: vec![],
                data: bs58::encode(sample_payload()).into_string(),
                stack_height: None,
            }],
        );

        let located = locate_posting_instruction(&json_envelope(UiMessage::Raw(message)), &program)
            .expect("instruction should be found");
        assert_eq!(located.author, payer.to_string());
    }

    #[test]
    fn finds_instruction_in_decoded_legacy_transaction() {
        let author = Pubkey::new_unique();
        let program = Pubkey::new_unique();
        let payload = sample_payload();
        let message = Message {
            header: header(),
            account_keys: vec![author, program],
            recent_blockhash: Hash::default(),
            instructions: vec![CompiledInstruction {
                program_id_index: 1,
                accounts: vec![0],
                data: payload.clone(),
            }],
        };
        let versioned = VersionedTransaction {
            signatures: vec![Signature::default()],
            message: VersionedMessage::Legacy(message),
        };

        let located =
            locate_in_versioned(&versioned, None, &program).expect("instruction should be found");
        assert_eq!(located.author, author.to_string());
        assert_eq!(located.payload, payload);
    }

    #[test]
    fn v0_transaction_resolves_program_from_loaded_addresses() {
        let payer = Pubkey::new_unique();
        let program = Pubkey::new_unique();
        let table = Pubkey::new_unique();
        let payload = sample_payload();
        // Static table holds only the payer; the program comes in through
        // an address table lookup and lands at index 1.
        let message = V0Message {
            header: header(),
            account_keys: vec![payer],
            recent_blockhash: Hash::default(),
            instructions: vec![CompiledInstruction {
                program_id_index: 1,
                accounts: vec![0],
                data: payload.clone(),
            }],
            address_table_lookups: vec![MessageAddressTableLookup {
                account_key: table,
                writable_indexes: vec![0],
                readonly_indexes: vec![],
            }],
        };
        let versioned = VersionedTransaction {
            signatures: vec![Signature::default()],
            message: VersionedMessage::V0(message),
        };
        let meta = meta_with_loaded(vec![program.to_string()]);

        let located = locate_in_versioned(&versioned, Some(&meta), &program)
            .expect("instruction should be found");
        assert_eq!(located.author, payer.to_string());
        assert_eq!(located.payload, payload);
    }

    #[test]
    fn undecodable_payload_is_treated_as_absent() {
        let author = Pubkey::new_unique();
        let program = Pubkey::new_unique();
        let message = raw_message(
            vec![author.to_string(), program.to_string()],
            vec![UiCompiledInstruction {
                program_id_index: 1,
                accounts: vec![0],
                // Characters outside both the base58 and base64 alphabets
                data: "!!not-an-encoding!!".to_string(),
                stack_height: None,
            }],
        );

        assert!(
            locate_posting_instruction(&json_envelope(UiMessage::Raw(message)), &program).is_none()
        );
    }
}
