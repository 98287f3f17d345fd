use anyhow::Result;
use crazyradio::DataRate;

fn main() -> Result<()> {
    let found = crazyradio::with_crazyradio(|radio| {
        let mut found = Vec::new();
        for rate in [DataRate::Rate250K, DataRate::Rate1M, DataRate::Rate2M] {
            radio.set_data_rate(rate)?;
            for channel in radio.scan_channels(0, 125, &[0xff])? {
                found.push((rate, channel));
            }
        }
        Ok(found)
    })?;

    for (rate, channel) in found {
        println!("Device found on channel {channel} at {rate}");
    }
    Ok(())
}
