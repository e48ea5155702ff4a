//! Wire layouts of the stake pool accounts

use {
    super::{
        AccountType, StakePool, StakeStatus, ValidatorList, ValidatorListHeader,
        ValidatorStakeInfo,
    },
    crate::{
        error::LayoutError,
        fee::{Fee, FutureEpochFee},
        layout::{
            pubkey, EnumLayout, Layout, OptionLayout, Record, RecordLayout, RecordReader,
            RecordWriter, Span, VecLayout, I64, U32, U64, U8,
        },
    },
    solana_program::{pubkey::PUBKEY_BYTES, stake::state::Lockup},
};

/// Layout of a [`Fee`]: denominator, then numerator
pub type FeeLayout = RecordLayout<Fee>;
/// Layout of a stake [`Lockup`]
pub type LockupLayout = RecordLayout<Lockup>;
/// Layout of a single validator list entry
pub type ValidatorStakeInfoLayout = RecordLayout<ValidatorStakeInfo>;
/// Layout of the validator list header
pub type ValidatorListHeaderLayout = RecordLayout<ValidatorListHeader>;
/// Layout of a whole validator list account
pub type ValidatorListLayout = RecordLayout<ValidatorList>;
/// Layout of a stake pool account
pub type StakePoolLayout = RecordLayout<StakePool>;

const FEE_LEN: usize = 2 * U64::LEN;

impl Record for Fee {
    const SPAN: Span = Span::Fixed(FEE_LEN);

    fn read(reader: &mut RecordReader<'_>) -> Result<Self, LayoutError> {
        Ok(Self {
            denominator: reader.read(&U64)?,
            numerator: reader.read(&U64)?,
        })
    }

    fn write(&self, writer: &mut RecordWriter<'_>) -> Result<(), LayoutError> {
        writer.write(&U64, &self.denominator)?;
        writer.write(&U64, &self.numerator)
    }
}

impl Record for Lockup {
    const SPAN: Span = Span::Fixed(I64::LEN + U64::LEN + PUBKEY_BYTES);

    fn read(reader: &mut RecordReader<'_>) -> Result<Self, LayoutError> {
        Ok(Self {
            unix_timestamp: reader.read(&I64)?,
            epoch: reader.read(&U64)?,
            custodian: reader.read(&pubkey())?,
        })
    }

    fn write(&self, writer: &mut RecordWriter<'_>) -> Result<(), LayoutError> {
        writer.write(&I64, &self.unix_timestamp)?;
        writer.write(&U64, &self.epoch)?;
        writer.write(&pubkey(), &self.custodian)
    }
}

/// [`FutureEpochFee`] stored as a one byte tag, followed by the fee unless
/// the tag is `0`
pub struct FutureEpochFeeLayout {
    property: &'static str,
}

impl FutureEpochFeeLayout {
    const NONE: u8 = 0;
    const ONE: u8 = 1;
    const TWO: u8 = 2;

    /// Create the layout for the named field
    pub const fn new(property: &'static str) -> Self {
        Self { property }
    }
}

impl Layout for FutureEpochFeeLayout {
    type Value = FutureEpochFee;

    fn span(&self) -> Span {
        Span::Variable
    }

    fn decode(&self, data: &[u8], offset: usize) -> Result<FutureEpochFee, LayoutError> {
        let mut reader = RecordReader::new(data, offset);
        match reader.read(&U8)? {
            Self::NONE => Ok(FutureEpochFee::None),
            Self::ONE => Ok(FutureEpochFee::One(reader.read(&FeeLayout::new())?)),
            Self::TWO => Ok(FutureEpochFee::Two(reader.read(&FeeLayout::new())?)),
            value => Err(LayoutError::InvalidDiscriminator {
                field: self.property,
                value,
            }),
        }
    }

    fn encode(
        &self,
        value: &FutureEpochFee,
        data: &mut [u8],
        offset: usize,
    ) -> Result<usize, LayoutError> {
        let mut writer = RecordWriter::new(data, offset);
        match value {
            FutureEpochFee::None => writer.write(&U8, &Self::NONE)?,
            FutureEpochFee::One(fee) => {
                writer.write(&U8, &Self::ONE)?;
                writer.write(&FeeLayout::new(), fee)?;
            }
            FutureEpochFee::Two(fee) => {
                writer.write(&U8, &Self::TWO)?;
                writer.write(&FeeLayout::new(), fee)?;
            }
        }
        Ok(writer.written())
    }

    fn encoded_len(&self, value: &FutureEpochFee) -> usize {
        match value {
            FutureEpochFee::None => U8::LEN,
            FutureEpochFee::One(_) | FutureEpochFee::Two(_) => U8::LEN + FEE_LEN,
        }
    }
}

impl Record for ValidatorStakeInfo {
    const SPAN: Span = Span::Fixed(ValidatorStakeInfo::LEN);

    fn read(reader: &mut RecordReader<'_>) -> Result<Self, LayoutError> {
        Ok(Self {
            active_stake_lamports: reader.read(&U64)?,
            transient_stake_lamports: reader.read(&U64)?,
            last_update_epoch: reader.read(&U64)?,
            transient_seed_suffix: reader.read(&U64)?,
            unused: reader.read(&U32)?,
            validator_seed_suffix: reader.read(&U32)?,
            status: reader.read(&EnumLayout::<StakeStatus>::new("status"))?,
            vote_account_address: reader.read(&pubkey())?,
        })
    }

    fn write(&self, writer: &mut RecordWriter<'_>) -> Result<(), LayoutError> {
        writer.write(&U64, &self.active_stake_lamports)?;
        writer.write(&U64, &self.transient_stake_lamports)?;
        writer.write(&U64, &self.last_update_epoch)?;
        writer.write(&U64, &self.transient_seed_suffix)?;
        writer.write(&U32, &self.unused)?;
        writer.write(&U32, &self.validator_seed_suffix)?;
        writer.write(&EnumLayout::<StakeStatus>::new("status"), &self.status)?;
        writer.write(&pubkey(), &self.vote_account_address)
    }
}

impl Record for ValidatorListHeader {
    const SPAN: Span = Span::Fixed(ValidatorListHeader::LEN);

    fn read(reader: &mut RecordReader<'_>) -> Result<Self, LayoutError> {
        Ok(Self {
            account_type: reader.read(&EnumLayout::<AccountType>::new("account_type"))?,
            max_validators: reader.read(&U32)?,
        })
    }

    fn write(&self, writer: &mut RecordWriter<'_>) -> Result<(), LayoutError> {
        writer.write(
            &EnumLayout::<AccountType>::new("account_type"),
            &self.account_type,
        )?;
        writer.write(&U32, &self.max_validators)
    }
}

fn validators() -> VecLayout<ValidatorStakeInfoLayout> {
    VecLayout::new(ValidatorStakeInfoLayout::new(), "validators")
}

impl Record for ValidatorList {
    fn read(reader: &mut RecordReader<'_>) -> Result<Self, LayoutError> {
        Ok(Self {
            header: reader.read(&ValidatorListHeaderLayout::new())?,
            validators: reader.read(&validators())?,
        })
    }

    fn write(&self, writer: &mut RecordWriter<'_>) -> Result<(), LayoutError> {
        writer.write(&ValidatorListHeaderLayout::new(), &self.header)?;
        writer.write(&validators(), &self.validators)
    }
}

impl Record for StakePool {
    fn read(reader: &mut RecordReader<'_>) -> Result<Self, LayoutError> {
        let optional_key = |property| OptionLayout::new(pubkey(), property);
        Ok(Self {
            account_type: reader.read(&EnumLayout::<AccountType>::new("account_type"))?,
            manager: reader.read(&pubkey())?,
            staker: reader.read(&pubkey())?,
            stake_deposit_authority: reader.read(&pubkey())?,
            stake_withdraw_bump_seed: reader.read(&U8)?,
            validator_list: reader.read(&pubkey())?,
            reserve_stake: reader.read(&pubkey())?,
            pool_mint: reader.read(&pubkey())?,
            manager_fee_account: reader.read(&pubkey())?,
            token_program_id: reader.read(&pubkey())?,
            total_lamports: reader.read(&U64)?,
            pool_token_supply: reader.read(&U64)?,
            last_update_epoch: reader.read(&U64)?,
            lockup: reader.read(&LockupLayout::new())?,
            epoch_fee: reader.read(&FeeLayout::new())?,
            next_epoch_fee: reader.read(&FutureEpochFeeLayout::new("next_epoch_fee"))?,
            preferred_deposit_validator_vote_address: reader
                .read(&optional_key("preferred_deposit_validator_vote_address"))?,
            preferred_withdraw_validator_vote_address: reader
                .read(&optional_key("preferred_withdraw_validator_vote_address"))?,
            stake_deposit_fee: reader.read(&FeeLayout::new())?,
            stake_withdrawal_fee: reader.read(&FeeLayout::new())?,
            next_stake_withdrawal_fee: reader
                .read(&FutureEpochFeeLayout::new("next_stake_withdrawal_fee"))?,
            stake_referral_fee: reader.read(&U8)?,
            sol_deposit_authority: reader.read(&optional_key("sol_deposit_authority"))?,
            sol_deposit_fee: reader.read(&FeeLayout::new())?,
            sol_referral_fee: reader.read(&U8)?,
            sol_withdraw_authority: reader.read(&optional_key("sol_withdraw_authority"))?,
            sol_withdrawal_fee: reader.read(&FeeLayout::new())?,
            next_sol_withdrawal_fee: reader
                .read(&FutureEpochFeeLayout::new("next_sol_withdrawal_fee"))?,
            last_epoch_pool_token_supply: reader.read(&U64)?,
            last_epoch_total_lamports: reader.read(&U64)?,
        })
    }

    fn write(&self, writer: &mut RecordWriter<'_>) -> Result<(), LayoutError> {
        let optional_key = |property| OptionLayout::new(pubkey(), property);
        writer.write(
            &EnumLayout::<AccountType>::new("account_type"),
            &self.account_type,
        )?;
        writer.write(&pubkey(), &self.manager)?;
        writer.write(&pubkey(), &self.staker)?;
        writer.write(&pubkey(), &self.stake_deposit_authority)?;
        writer.write(&U8, &self.stake_withdraw_bump_seed)?;
        writer.write(&pubkey(), &self.validator_list)?;
        writer.write(&pubkey(), &self.reserve_stake)?;
        writer.write(&pubkey(), &self.pool_mint)?;
        writer.write(&pubkey(), &self.manager_fee_account)?;
        writer.write(&pubkey(), &self.token_program_id)?;
        writer.write(&U64, &self.total_lamports)?;
        writer.write(&U64, &self.pool_token_supply)?;
        writer.write(&U64, &self.last_update_epoch)?;
        writer.write(&LockupLayout::new(), &self.lockup)?;
        writer.write(&FeeLayout::new(), &self.epoch_fee)?;
        writer.write(
            &FutureEpochFeeLayout::new("next_epoch_fee"),
            &self.next_epoch_fee,
        )?;
        writer.write(
            &optional_key("preferred_deposit_validator_vote_address"),
            &self.preferred_deposit_validator_vote_address,
        )?;
        writer.write(
            &optional_key("preferred_withdraw_validator_vote_address"),
            &self.preferred_withdraw_validator_vote_address,
        )?;
        writer.write(&FeeLayout::new(), &self.stake_deposit_fee)?;
        writer.write(&FeeLayout::new(), &self.stake_withdrawal_fee)?;
        writer.write(
            &FutureEpochFeeLayout::new("next_stake_withdrawal_fee"),
            &self.next_stake_withdrawal_fee,
        )?;
        writer.write(&U8, &self.stake_referral_fee)?;
        writer.write(
            &optional_key("sol_deposit_authority"),
            &self.sol_deposit_authority,
        )?;
        writer.write(&FeeLayout::new(), &self.sol_deposit_fee)?;
        writer.write(&U8, &self.sol_referral_fee)?;
        writer.write(
            &optional_key("sol_withdraw_authority"),
            &self.sol_withdraw_authority,
        )?;
        writer.write(&FeeLayout::new(), &self.sol_withdrawal_fee)?;
        writer.write(
            &FutureEpochFeeLayout::new("next_sol_withdrawal_fee"),
            &self.next_sol_withdrawal_fee,
        )?;
        writer.write(&U64, &self.last_epoch_pool_token_supply)?;
        writer.write(&U64, &self.last_epoch_total_lamports)
    }
}
