use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use taic_shared::clients::db::DbPool;
use taic_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{NewStake, Stake, User};
use crate::schema::{stakes, users};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_UNSTAKED: &str = "unstaked";

#[derive(Debug)]
pub struct StakeOutcome {
    pub stake: Stake,
    pub new_balance: i64,
    pub total_staked: i64,
}

#[derive(Debug)]
pub struct UnstakeOutcome {
    pub unstaked_amount: i64,
    pub new_balance: i64,
    pub total_staked: i64,
}

/// Move `amount` from the spendable balance into a new active stake.
/// Runs in one transaction; the user row lock serializes concurrent
/// balance mutations for the same user.
pub fn stake(pool: &DbPool, user_id: Uuid, amount: i64) -> AppResult<StakeOutcome> {
    if amount <= 0 {
        return Err(AppError::new(ErrorCode::InvalidAmount, "amount must be positive"));
    }

    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    conn.transaction::<_, AppError, _>(|conn| {
        let user: User = users::table
            .find(user_id)
            .for_update()
            .first(conn)
            .map_err(|_| AppError::not_found("user not found"))?;

        if user.balance < amount {
            return Err(AppError::new(
                ErrorCode::InsufficientBalance,
                "insufficient balance to stake",
            ));
        }

        let stake: Stake = diesel::insert_into(stakes::table)
            .values(&NewStake {
                user_id,
                amount,
                status: STATUS_ACTIVE.to_string(),
            })
            .get_result(conn)?;

        let updated: User = diesel::update(users::table.find(user_id))
            .set((
                users::balance.eq(user.balance - amount),
                users::staked_balance.eq(user.staked_balance + amount),
                users::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)?;

        tracing::info!(user_id = %user_id, stake_id = %stake.id, amount, "stake created");

        Ok(StakeOutcome {
            stake,
            new_balance: updated.balance,
            total_staked: updated.staked_balance,
        })
    })
}

/// Release a stake back to the spendable balance, all-or-nothing.
/// The stake row lock serializes concurrent unstakes of the same stake:
/// the loser of the race observes `unstaked` status and fails without
/// touching any balance.
pub fn unstake(pool: &DbPool, user_id: Uuid, stake_id: Uuid) -> AppResult<UnstakeOutcome> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    conn.transaction::<_, AppError, _>(|conn| {
        let stake: Stake = stakes::table
            .find(stake_id)
            .for_update()
            .first(conn)
            .optional()?
            .ok_or_else(|| AppError::new(ErrorCode::StakeNotFound, "stake not found"))?;

        if stake.user_id != user_id {
            return Err(AppError::new(ErrorCode::StakeNotOwned, "stake belongs to another user"));
        }
        if stake.status != STATUS_ACTIVE {
            return Err(AppError::new(ErrorCode::StakeAlreadyUnstaked, "stake already unstaked"));
        }

        diesel::update(stakes::table.find(stake_id))
            .set((
                stakes::status.eq(STATUS_UNSTAKED),
                stakes::unstaked_at.eq(Some(Utc::now())),
            ))
            .execute(conn)?;

        let user: User = users::table.find(user_id).for_update().first(conn)?;

        let updated: User = diesel::update(users::table.find(user_id))
            .set((
                users::balance.eq(user.balance + stake.amount),
                users::staked_balance.eq(user.staked_balance - stake.amount),
                users::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)?;

        tracing::info!(user_id = %user_id, stake_id = %stake_id, amount = stake.amount, "stake released");

        Ok(UnstakeOutcome {
            unstaked_amount: stake.amount,
            new_balance: updated.balance,
            total_staked: updated.staked_balance,
        })
    })
}

/// Balances plus the user's stake history, newest first.
pub fn summary(pool: &DbPool, user_id: Uuid) -> AppResult<(User, Vec<Stake>)> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    let user: User = users::table
        .find(user_id)
        .first(&mut conn)
        .map_err(|_| AppError::not_found("user not found"))?;

    let stakes: Vec<Stake> = stakes::table
        .filter(stakes::user_id.eq(user_id))
        .order(stakes::created_at.desc())
        .load(&mut conn)?;

    Ok((user, stakes))
}
