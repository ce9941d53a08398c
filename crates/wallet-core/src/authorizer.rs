//! Access key authorization.
//!
//! Decides, without touching the network, whether one access key's
//! permission covers a transaction.

use wallet_types::{AccessKeyPermission, AccessKeyRecord, AccountId, Action, FunctionCallPermission};

/// Method exposed by multisig contracts for confirming requests. A key
/// scoped to the account itself with this method may sign anything routed
/// through the account.
pub const MULTISIG_CONFIRM_METHOD: &str = "add_request_and_confirm";

/// Returns true when `record` may sign `actions` sent to `receiver_id` on
/// behalf of `own_account_id`.
pub fn authorizes(
	own_account_id: &AccountId,
	record: &AccessKeyRecord,
	receiver_id: &AccountId,
	actions: &[Action],
) -> bool {
	match record.permission() {
		AccessKeyPermission::FullAccess => true,
		AccessKeyPermission::FunctionCall(permission) => {
			function_call_authorizes(own_account_id, permission, receiver_id, actions)
		}
	}
}

fn function_call_authorizes(
	own_account_id: &AccountId,
	permission: &FunctionCallPermission,
	receiver_id: &AccountId,
	actions: &[Action],
) -> bool {
	if permission.receiver_id == *own_account_id
		&& permission
			.method_names
			.iter()
			.any(|m| m == MULTISIG_CONFIRM_METHOD)
	{
		return true;
	}

	if permission.receiver_id != *receiver_id {
		return false;
	}

	match actions {
		[Action::FunctionCall {
			method_name,
			deposit,
			..
		}] => {
			// Allowance keys can never move funds.
			*deposit == 0
				&& (permission.method_names.is_empty()
					|| permission.method_names.iter().any(|m| m == method_name))
		}
		_ => false,
	}
}
