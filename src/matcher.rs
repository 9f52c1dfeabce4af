use solana_pubkey::Pubkey;

use crate::protocols::DISCRIMINATOR_LEN;
use crate::types::{CompiledInstruction, FetchedTransaction};

/// Recognizes calls to one program instruction by program id and
/// discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionMatcher {
    program_id: Pubkey,
    discriminator: [u8; DISCRIMINATOR_LEN],
}

impl InstructionMatcher {
    pub fn new(program_id: Pubkey, discriminator: [u8; DISCRIMINATOR_LEN]) -> Self {
        Self {
            program_id,
            discriminator,
        }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn discriminator(&self) -> [u8; DISCRIMINATOR_LEN] {
        self.discriminator
    }

    pub fn matches(&self, instruction: &CompiledInstruction, account_keys: &[Pubkey]) -> bool {
        let Some(program) = account_keys.get(usize::from(instruction.program_id_index)) else {
            return false;
        };
        *program == self.program_id
            && instruction
                .data
                .first_chunk::<DISCRIMINATOR_LEN>()
                .is_some_and(|prefix| *prefix == self.discriminator)
    }

    /// First matching top-level instruction and its position. Later
    /// instructions are not inspected once one matches.
    pub fn find_first<'a>(
        &self,
        transaction: &'a FetchedTransaction,
    ) -> Option<(usize, &'a CompiledInstruction)> {
        transaction
            .instructions
            .iter()
            .enumerate()
            .find(|(_, ix)| self.matches(ix, &transaction.account_keys))
    }
}
