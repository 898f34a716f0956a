// Service exports
pub mod ledger;
pub mod notifier;
pub mod sms;
pub mod supabase;

pub use ledger::NotificationLedger;
pub use notifier::{Notifier, NotifierError};
pub use sms::{normalize_phone, SmsClient, SmsError, SmsReceipt};
pub use supabase::{SupabaseClient, SupabaseError, SupabaseTables};
