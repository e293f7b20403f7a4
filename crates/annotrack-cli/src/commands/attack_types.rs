use annotrack_core::AttackType;

use crate::output::{attack_types_table, Printer};
use crate::Result;

pub fn run(printer: Printer) -> Result<()> {
    printer.show(&AttackType::ALL, |all| attack_types_table(all))
}
