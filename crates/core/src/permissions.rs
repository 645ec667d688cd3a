//! Discord permission bits the bot cares about.
//!
//! Discord serializes permission bitfields as decimal strings so they fit
//! in JSON numbers on every client.

/// `MANAGE_GUILD` (1 << 5). Staff commands require it.
pub const MANAGE_GUILD: u64 = 1 << 5;

/// `ADMINISTRATOR` (1 << 3) implies every other permission.
pub const ADMINISTRATOR: u64 = 1 << 3;

/// Bitfield string sent as `default_member_permissions` for staff commands.
pub fn staff_permission_string() -> String {
    MANAGE_GUILD.to_string()
}

/// Parse a Discord permission bitfield string.
///
/// Returns `None` for anything that is not an unsigned decimal integer.
pub fn parse_bitfield(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

/// Whether `bitfield` grants `required`, honouring `ADMINISTRATOR`.
pub fn has_permission(bitfield: u64, required: u64) -> bool {
    bitfield & ADMINISTRATOR != 0 || bitfield & required == required
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manage_guild_is_bit_five() {
        assert_eq!(MANAGE_GUILD, 32);
        assert_eq!(staff_permission_string(), "32");
    }

    #[test]
    fn exact_bit_grants_permission() {
        assert!(has_permission(MANAGE_GUILD, MANAGE_GUILD));
        assert!(has_permission(MANAGE_GUILD | 1, MANAGE_GUILD));
    }

    #[test]
    fn administrator_grants_everything() {
        assert!(has_permission(ADMINISTRATOR, MANAGE_GUILD));
    }

    #[test]
    fn missing_bit_denies() {
        assert!(!has_permission(0, MANAGE_GUILD));
        assert!(!has_permission(1 << 4, MANAGE_GUILD));
    }

    #[test]
    fn parses_large_bitfields() {
        assert_eq!(parse_bitfield("2199023255551"), Some(2_199_023_255_551));
        assert_eq!(parse_bitfield(" 32 "), Some(32));
        assert_eq!(parse_bitfield("-1"), None);
        assert_eq!(parse_bitfield("abc"), None);
    }
}
