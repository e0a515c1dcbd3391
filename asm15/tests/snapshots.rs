use asm15::{assemble_module, expand};

#[test]
fn test_sample_module() {
    let program_text = include_str!("../programs/ps.as");
    let assembly = assemble_module(program_text).unwrap();

    insta::assert_snapshot!(assembly.object_text(), @r###"
    20 6
    0100 02024
    0101 00304
    0102 01732
    0103 44024
    0104 00001
    0105 60014
    0106 77734
    0107 60044
    0108 00034
    0109 06104
    0110 00124
    0111 10224
    0112 00144
    0113 01752
    0114 20504
    0115 01702
    0116 00064
    0117 50024
    0118 01472
    0119 74004
    0120 00141
    0121 00142
    0122 00000
    0123 00006
    0124 77767
    0125 00026
    "###);
    assert_eq!(
        assembly.entries_text().as_deref(),
        Some("MAIN 100\nCOUNT 125\n")
    );
    assert_eq!(assembly.externs_text().as_deref(), Some("EXT 104\n"));
}

#[test]
fn test_sample_expansion() {
    let program_text = include_str!("../programs/ps.as");
    let expansion = expand(program_text).unwrap();
    let text = expansion.text();
    let lines = text.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 20);
    assert_eq!(lines[1..4], [".extern EXT", ".entry MAIN", ""]);
    assert_eq!(
        lines[7..13],
        [
            "MAIN: mov r3,LIST",
            "LOOP: jmp EXT",
            "prn #-5",
            "prn *r3",
            "cmp r1,r2",
            "add #12,COUNT",
        ]
    );
    assert_eq!(lines[19], ".entry COUNT");
    assert!(text.lines().all(|line| !line.contains("macr")));
}

#[test]
fn test_module_without_listings() {
    let program_text = include_str!("../programs/no_entries.as");
    let assembly = assemble_module(program_text).unwrap();

    insta::assert_snapshot!(assembly.object_text(), @r###"
    3 0
    0100 34104
    0101 00024
    0102 74004
    "###);
    assert_eq!(assembly.entries_text(), None);
    assert_eq!(assembly.externs_text(), None);
}

#[test]
fn test_deterministic() {
    let program_text = include_str!("../programs/ps.as");
    let first = assemble_module(program_text).unwrap();
    let second = assemble_module(program_text).unwrap();

    assert_eq!(first.object_text(), second.object_text());
    assert_eq!(first.entries_text(), second.entries_text());
    assert_eq!(first.externs_text(), second.externs_text());
}

#[test]
fn test_counts_match_words() {
    let program_text = include_str!("../programs/ps.as");
    let assembly = assemble_module(program_text).unwrap();

    let header = assembly.object_text().lines().next().unwrap().to_owned();
    assert_eq!(
        header,
        format!("{} {}", assembly.code.len(), assembly.data.len())
    );
    assert!(assembly.code.iter().all(|word| !word.pending));
    assert_eq!(assembly.data.first().unwrap().address, 100 + assembly.code.len());
}
