//! Tofino device configuration constants.

use crate::device::{DeviceGeometry, ParserGeometry, PortGeometry};
use crate::idle::IdleTimeGeometry;
use crate::layout::{AddressKind, AddressLayout, BitField};
use crate::memory::{MemUnit, MemUnits};
use rmt_types::ChipFamily;

pub const PARSER_DEPTH: u32 = 256;
pub const PARSER_INIT_RAM_DEPTH: u32 = 16;
pub const PARSER_CSUM_DEPTH: u32 = 32;
pub const PRSR_REG_DEPTH: u32 = 29;
pub const NUM_PORTS_PER_PIPE: u32 = 72;
pub const NUM_CHN_PER_PORT: u32 = 4;

pub const SRAM_UNIT_WIDTH: u32 = 128;
pub const SRAM_UNIT_DEPTH: u32 = 1024;
pub const SRAM_NUM_RAM_LINE_BITS: u32 = 10;
pub const MAXIMUM_ACTION_DATA_BYTES: u32 = 128;

pub const TCAM_NUM_ROWS: u32 = 12;
pub const TCAM_UNIT_WIDTH: u32 = 44;
pub const TCAM_UNIT_DEPTH: u32 = 512;

pub const MAP_RAM_UNIT_WIDTH: u32 = 11;
pub const MAP_RAM_UNIT_DEPTH: u32 = 1024;

pub const PHASE0_UNIT_WIDTH: u32 = 32;
pub const PHASE0_UNIT_DEPTH: u32 = 1;

// Statistics RAM VPN address
pub const STATS_RAM_NUM_SUBWORD_BITS: u32 = 3;
pub const STATS_RAM_NUM_VPN_BITS: u32 = 6;
pub const STATS_RAM_NUM_ADDR_BITS: u32 = 19;
pub const STATS_RAM_VPN_SHIFT: u32 = STATS_RAM_NUM_SUBWORD_BITS + SRAM_NUM_RAM_LINE_BITS;

pub const ADT_ADDR_PFE_BIT_POSITION: u32 = 22;
pub const ADT_ADDR_NUM_SUBWORD_BITS: u32 = 5;

// Meter RAM VPN address
pub const METER_ADDR_PFE_BIT_POSITION: u32 = 23;
pub const METER_ADDR_METER_TYPE_BIT_POSITION: u32 = 24;
pub const METER_ADDR_SEL_TYPE_BIT_POSITION: u32 = 26;
pub const METER_ADDR_NUM_PFE_BITS: u32 = 1;
pub const METER_ADDR_NUM_METER_TYPE_BITS: u32 = 3;
pub const METER_ADDR_NUM_SUBWORD_BITS: u32 = 7;

// Acceptable idle counter periods are 2^21 - 2^36
pub const MIN_IDLE_TIMEOUT_COUNTER_BIT: u32 = 21;
pub const MAX_IDLE_TIMEOUT_COUNTER_WIDTH: u32 = 15;
pub const IDLE_SUBWORD_VPN_BITS: u32 = 4;

pub const EXM_SUBWORD_VPN_BITS: u32 = 9;

pub const SEL_SUBWORD_VPN_BITS: u32 = 5;
pub const SELECTOR_HUFFMAN_BITS: u32 = 7;

/// VPN width shared by every SRAM-backed array except action data.
pub const VPN_BITS: u32 = 6;

const fn sram_layout(kind: AddressKind, subword_bits: u32) -> AddressLayout {
    AddressLayout {
        kind,
        addr_bits: subword_bits + SRAM_NUM_RAM_LINE_BITS + VPN_BITS,
        subword_bits,
        line_bits: SRAM_NUM_RAM_LINE_BITS,
        vpn_bits: VPN_BITS,
        pfe_bit: None,
        type_field: None,
        selector_type_bit: None,
        overhead_bits: 0,
    }
}

/// Statistics address: `vpn << 13 | line << 3 | subword`, 19 bits.
pub const fn stats_layout() -> AddressLayout {
    sram_layout(AddressKind::Stats, STATS_RAM_NUM_SUBWORD_BITS)
}

/// Meter address: location in bits 0-22, PFE at 23, meter type at 24-26.
pub const fn meter_layout() -> AddressLayout {
    AddressLayout {
        addr_bits: METER_ADDR_METER_TYPE_BIT_POSITION + METER_ADDR_NUM_METER_TYPE_BITS,
        pfe_bit: Some(METER_ADDR_PFE_BIT_POSITION),
        type_field: Some(BitField::new(
            METER_ADDR_METER_TYPE_BIT_POSITION,
            METER_ADDR_NUM_METER_TYPE_BITS,
        )),
        selector_type_bit: Some(METER_ADDR_SEL_TYPE_BIT_POSITION),
        ..sram_layout(AddressKind::Meter, METER_ADDR_NUM_SUBWORD_BITS)
    }
}

/// Selector address with a 7-bit huffman overhead carried alongside.
pub const fn selector_layout() -> AddressLayout {
    AddressLayout {
        overhead_bits: SELECTOR_HUFFMAN_BITS,
        ..sram_layout(AddressKind::Selector, SEL_SUBWORD_VPN_BITS)
    }
}

/// Idle-timeout address over map RAM lines.
pub const fn idle_layout() -> AddressLayout {
    sram_layout(AddressKind::IdleTimeout, IDLE_SUBWORD_VPN_BITS)
}

/// Exact-match address with a 9-bit subword.
pub const fn exm_layout() -> AddressLayout {
    sram_layout(AddressKind::ExactMatch, EXM_SUBWORD_VPN_BITS)
}

/// Action-data address: VPN takes every bit below the PFE at 22.
pub const fn adt_layout() -> AddressLayout {
    let vpn_bits =
        ADT_ADDR_PFE_BIT_POSITION - ADT_ADDR_NUM_SUBWORD_BITS - SRAM_NUM_RAM_LINE_BITS;
    AddressLayout {
        kind: AddressKind::ActionData,
        addr_bits: ADT_ADDR_PFE_BIT_POSITION + 1,
        subword_bits: ADT_ADDR_NUM_SUBWORD_BITS,
        line_bits: SRAM_NUM_RAM_LINE_BITS,
        vpn_bits,
        pfe_bit: Some(ADT_ADDR_PFE_BIT_POSITION),
        type_field: None,
        selector_type_bit: None,
        overhead_bits: 0,
    }
}

/// The complete Tofino geometry record.
pub fn geometry() -> DeviceGeometry {
    DeviceGeometry {
        chip: ChipFamily::Tofino,
        units: MemUnits {
            sram: MemUnit::new(SRAM_UNIT_WIDTH, SRAM_UNIT_DEPTH),
            tcam: MemUnit::new(TCAM_UNIT_WIDTH, TCAM_UNIT_DEPTH),
            map_ram: MemUnit::new(MAP_RAM_UNIT_WIDTH, MAP_RAM_UNIT_DEPTH),
            phase0: MemUnit::new(PHASE0_UNIT_WIDTH, PHASE0_UNIT_DEPTH),
        },
        tcam_rows: TCAM_NUM_ROWS,
        max_action_data_bytes: MAXIMUM_ACTION_DATA_BYTES,
        stats: stats_layout(),
        meter: meter_layout(),
        selector: selector_layout(),
        idle: idle_layout(),
        exm: exm_layout(),
        adt: adt_layout(),
        idle_time: IdleTimeGeometry {
            min_counter_bit: MIN_IDLE_TIMEOUT_COUNTER_BIT,
            max_counter_width: MAX_IDLE_TIMEOUT_COUNTER_WIDTH,
        },
        parser: ParserGeometry {
            depth: PARSER_DEPTH,
            init_ram_depth: PARSER_INIT_RAM_DEPTH,
            csum_depth: PARSER_CSUM_DEPTH,
            reg_depth: PRSR_REG_DEPTH,
        },
        ports: PortGeometry {
            ports_per_pipe: NUM_PORTS_PER_PIPE,
            channels_per_port: NUM_CHN_PER_PORT,
        },
    }
}
