pub mod canonical_decode_use_case;
